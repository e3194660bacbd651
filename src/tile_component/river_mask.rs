use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::grid::Direction;

bitflags! {
    /// River connections of a tile towards its cardinal neighbours.
    ///
    /// A tile with an empty mask has no river. Bits 0 to 3 are north, east, south and west.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
    pub struct RiverMask: u8 {
        const NORTH = 0b0001;
        const EAST = 0b0010;
        const SOUTH = 0b0100;
        const WEST = 0b1000;
    }
}

impl RiverMask {
    /// Returns the bit of a cardinal direction.
    ///
    /// # Panics
    ///
    /// Panics if `direction` is not cardinal.
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => RiverMask::NORTH,
            Direction::East => RiverMask::EAST,
            Direction::South => RiverMask::SOUTH,
            Direction::West => RiverMask::WEST,
            _ => panic!("River connections only exist in cardinal directions."),
        }
    }

    /// Iterates over the directions the mask connects to.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::CARDINAL
            .into_iter()
            .filter(move |&direction| self.contains(RiverMask::from_direction(direction)))
    }
}
