use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Exploration state of a tile.
    ///
    /// Generation always leaves it empty; the game session updates it as players explore.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
    pub struct Visibility: u8 {
        const EXPLORED = 0b01;
        const VISIBLE = 0b10;
    }
}
