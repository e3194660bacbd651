//! The rectangular grid the world is laid out on.

pub mod direction;
pub mod offset_coordinate;
pub mod square_grid;

pub use direction::Direction;
pub use offset_coordinate::OffsetCoordinate;
pub use square_grid::{SquareGrid, square::Square};

use serde::{Deserialize, Serialize};

/// Width and height of a grid, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the number of tiles in the grid.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width * self.height
    }
}
