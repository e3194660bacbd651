//! The finished map handed to the game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    height_map::MAX_HEIGHT,
    map_parameters::GeneratorMode,
    player::Player,
    tile_component::{Resource, TemperatureBand, Terrain, Visibility},
    tile_map::TileMap,
};

/// Immutable snapshot of a generated map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapResult {
    pub width: u32,
    pub height: u32,
    /// Every tile, row by row from the north-west corner.
    pub tiles: Vec<TileSnapshot>,
    /// One entry per player that could be placed, in roster order.
    pub starting_positions: Vec<StartingPosition>,
    /// Seed that reproduces this map.
    pub seed: String,
    pub generated_at: DateTime<Utc>,
    /// Strategy that produced the map. `Island` when a fair map fell back.
    pub mode: GeneratorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub x: u32,
    pub y: u32,
    /// Elevation rescaled to `0..=255`.
    pub elevation: u8,
    pub temperature: TemperatureBand,
    pub terrain: Terrain,
    /// River connections: bit 0 north, 1 east, 2 south, 3 west.
    pub river_mask: u8,
    /// `0` for water.
    pub continent_id: u32,
    pub resource: Option<Resource>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StartingPosition {
    pub player_id: u32,
    pub x: u32,
    pub y: u32,
}

impl MapResult {
    /// Takes the snapshot of a finished tile map. Starting tiles are matched with `players`
    /// in order.
    pub fn from_tile_map(
        tile_map: &TileMap,
        players: &[Player],
        seed: String,
        mode: GeneratorMode,
    ) -> Self {
        let grid = tile_map.grid;
        let tiles = tile_map
            .all_tiles()
            .map(|tile| {
                let position = tile.to_offset(grid);
                TileSnapshot {
                    x: position.x() as u32,
                    y: position.y() as u32,
                    elevation: (tile.height(tile_map).min(MAX_HEIGHT) * 255 / MAX_HEIGHT) as u8,
                    temperature: tile.temperature_band(tile_map),
                    terrain: tile.terrain(tile_map),
                    river_mask: tile.river_mask(tile_map).bits(),
                    continent_id: tile.continent_id(tile_map),
                    resource: tile.resource(tile_map),
                    visibility: tile_map.visibility_list[tile.index()],
                }
            })
            .collect();

        let starting_positions = players
            .iter()
            .zip(&tile_map.starting_tile_list)
            .map(|(player, tile)| {
                let position = tile.to_offset(grid);
                StartingPosition {
                    player_id: player.id,
                    x: position.x() as u32,
                    y: position.y() as u32,
                }
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            tiles,
            starting_positions,
            seed,
            generated_at: Utc::now(),
            mode,
        }
    }

    /// Returns the tile at `(x, y)`, or `None` outside the map.
    pub fn tile(&self, x: u32, y: u32) -> Option<&TileSnapshot> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::MapResult;
    use crate::{
        map_parameters::{GeneratorMode, MapParameters},
        player::Player,
        tile::Tile,
        tile_component::{Resource, Terrain},
        tile_map::TileMap,
    };

    fn snapshot() -> MapResult {
        let mut tile_map = TileMap::new(&MapParameters::with_size(20, 20), "snapshot");
        let tile = Tile::new(21);
        tile.set_terrain(&mut tile_map, Terrain::Grassland);
        tile.set_resource(&mut tile_map, Resource::Wheat);
        tile_map.height_list[tile.index()] = 1000;
        tile_map.continent_id_list[tile.index()] = 1;
        tile_map.starting_tile_list = vec![tile];

        let players = [Player::new(7, "Ada"), Player::new(9, "Grace")];
        MapResult::from_tile_map(&tile_map, &players, "snapshot".to_string(), GeneratorMode::Fractal)
    }

    #[test]
    fn snapshot_keeps_tile_layers() {
        let result = snapshot();
        let tile = result.tile(1, 1).unwrap();
        assert_eq!(tile.elevation, 255);
        assert_eq!(tile.terrain, Terrain::Grassland);
        assert_eq!(tile.resource, Some(Resource::Wheat));
        assert_eq!(tile.continent_id, 1);
        assert!(result.tile(20, 0).is_none());
    }

    #[test]
    fn starts_are_matched_with_players_in_order() {
        let result = snapshot();
        assert_eq!(result.starting_positions.len(), 1);
        assert_eq!(result.starting_positions[0].player_id, 7);
        assert_eq!((result.starting_positions[0].x, result.starting_positions[0].y), (1, 1));
    }

    #[test]
    fn json_reconstructs_the_snapshot() {
        let result = snapshot();
        let json = result.to_json().unwrap();
        assert_eq!(MapResult::from_json(&json).unwrap(), result);
    }
}
