//! Procedural world maps for turn-based strategy games.
//!
//! [`MapGenerator`] turns a [`MapParameters`] and a player roster into a [`MapResult`]:
//! a square grid where every tile has an elevation, a temperature band, a terrain, river
//! connections, a continent and possibly a resource, plus one starting position per player.
//! The same parameters, seed and roster always give the same map.

pub mod error;
pub mod grid;
pub mod height_map;
pub mod island_generator;
pub mod map_generator;
pub mod map_parameters;
pub mod map_result;
pub mod player;
pub mod random;
pub mod tile;
pub mod tile_component;
pub mod tile_map;

pub use error::{FairFailure, MapGenError};
pub use grid::*;
pub use map_generator::{Generator, MapGenerator};
pub use map_parameters::{GeneratorMode, IslandLayout, MapParameters, TerrainSettings};
pub use map_result::{MapResult, StartingPosition, TileSnapshot};
pub use player::Player;
pub use tile_map::TileMap;

/// Generates a map with the configured mode.
pub fn generate_map(map_parameters: MapParameters, players: &[Player]) -> Result<MapResult, MapGenError> {
    MapGenerator::new(map_parameters)?.generate(players, None)
}
