//! This module contains the components of the tile in the map.
//! For example, it includes the tile's Terrain, TemperatureBand, Resource, RiverMask, and so on.

pub mod resource;
pub mod river_mask;
pub mod temperature;
pub mod terrain;
pub mod visibility;
pub mod wetness;

pub use resource::{Resource, ResourceCategory};
pub use river_mask::RiverMask;
pub use temperature::{TemperatureBand, TemperatureMask};
pub use terrain::Terrain;
pub use visibility::Visibility;
pub use wetness::{ElevationCondition, WetnessClass, WetnessCondition};
