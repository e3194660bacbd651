//! This module defines the [`TileMap`] struct and its associated methods.
//! It provides functionality to manage and query the layers of the map being generated.
//! Its method contains 2 parts:
//! 1. The common methods for map generation, included in the `mod.rs` file.
//! 2. The map generating methods are defined in the [`impls`] module ( which is the submodule of this module).

use std::collections::VecDeque;

use crate::{
    grid::SquareGrid,
    height_map::{HeightGenerator, MAX_HEIGHT},
    map_parameters::{MapParameters, TerrainPercentages},
    random::MapRng,
    tile::Tile,
    tile_component::*,
};

mod impls;

pub use impls::*;

/// The grid being generated. Every layer is a `Vec` indexed by [`Tile::index()`].
#[derive(PartialEq, Debug, Clone)]
pub struct TileMap {
    /// Random number generator for the map. Every generation step draws from it.
    pub random_number_generator: MapRng,
    pub grid: SquareGrid,
    /// Elevation of each tile, in `0..=MAX_HEIGHT`.
    pub height_list: Vec<u32>,
    /// Continuous temperature of each tile, in `0..=1000`.
    pub temperature_list: Vec<u32>,
    pub temperature_band_list: Vec<TemperatureBand>,
    pub terrain_list: Vec<Terrain>,
    /// Moisture of each tile, in `0..=100`.
    pub wetness_list: Vec<u32>,
    pub river_mask_list: Vec<RiverMask>,
    /// Continent ID of each tile. `0` for water, dense from `1` for land.
    pub continent_id_list: Vec<u32>,
    /// Number of tiles of each continent. The index is the continent ID; index `0` is unused.
    pub continent_size_list: Vec<u32>,
    pub resource_list: Vec<Option<Resource>>,
    pub visibility_list: Vec<Visibility>,
    /// Whether the terrain of each tile has been settled by the current step.
    pub placed_list: Vec<bool>,
    /// Starting tiles, in player order.
    pub starting_tile_list: Vec<Tile>,
    /// Elevation below which a tile is water.
    pub shore_level: u32,
    /// Land below this elevation is lowland.
    pub low_level: u32,
    /// Land above this elevation tends to become hills or mountains.
    pub mountain_level: u32,
    pub terrain_percentages: TerrainPercentages,
    /// Temperature bias of the world, `0..=100`.
    pub temperature_bias: u32,
}

impl TileMap {
    /// Creates an all-ocean tile map with the given parameters, seeded with `seed`.
    pub fn new(map_parameters: &MapParameters, seed: &str) -> Self {
        let grid = SquareGrid::new(map_parameters.map_size);
        let size = grid.area();
        let settings = &map_parameters.terrain_settings;

        let shore_level = MAX_HEIGHT * (100 - settings.land_percent) / 100;
        let low_level = (4 * shore_level + MAX_HEIGHT) / 5;
        let mountain_level =
            (MAX_HEIGHT - shore_level) * (100 - settings.steepness) / 100 + shore_level;

        Self {
            random_number_generator: MapRng::from_seed_str(seed),
            grid,
            height_list: vec![0; size],
            temperature_list: vec![0; size],
            temperature_band_list: vec![TemperatureBand::Temperate; size],
            terrain_list: vec![Terrain::DeepOcean; size],
            wetness_list: vec![0; size],
            river_mask_list: vec![RiverMask::empty(); size],
            continent_id_list: vec![0; size],
            continent_size_list: vec![0],
            resource_list: vec![None; size],
            visibility_list: vec![Visibility::empty(); size],
            placed_list: vec![false; size],
            starting_tile_list: Vec::new(),
            shore_level,
            low_level,
            mountain_level,
            terrain_percentages: settings.effective_percentages(),
            temperature_bias: settings.temperature,
        }
    }

    /// Returns an iterator over all tiles in the map.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn all_tiles(&self) -> impl Iterator<Item = Tile> + use<> {
        (0..self.grid.area()).map(Tile::new)
    }

    /// Runs a height generator with the map's random number generator and stores its output.
    pub fn apply_height_map(&mut self, height_generator: &mut impl HeightGenerator) {
        height_generator.generate(&mut self.random_number_generator);
        self.height_list = height_generator.height_map().to_vec();
    }

    /// Puts every layer except the random number generator back to its initial state.
    pub fn reset_layers(&mut self) {
        let size = self.grid.area();
        self.height_list = vec![0; size];
        self.terrain_list = vec![Terrain::DeepOcean; size];
        self.wetness_list = vec![0; size];
        self.river_mask_list = vec![RiverMask::empty(); size];
        self.continent_id_list = vec![0; size];
        self.continent_size_list = vec![0];
        self.resource_list = vec![None; size];
        self.placed_list = vec![false; size];
        self.starting_tile_list.clear();
    }

    pub fn land_tile_count(&self) -> usize {
        self.terrain_list
            .iter()
            .filter(|terrain| terrain.is_land())
            .count()
    }

    pub fn river_tile_count(&self) -> usize {
        self.river_mask_list
            .iter()
            .filter(|mask| !mask.is_empty())
            .count()
    }

    /// Number of continents labeled by [`TileMap::assign_continent_numbers`].
    pub fn continent_count(&self) -> usize {
        self.continent_size_list.len() - 1
    }

    /// Returns the tiles connected to `start_tile` through cardinal steps, in breadth-first order.
    ///
    /// `check_tile(tile, before_tile)` decides whether `tile`, reached from `before_tile`,
    /// belongs to the same body.
    pub fn flood_fill(&self, start_tile: Tile, check_tile: impl Fn(Tile, Tile) -> bool) -> Vec<Tile> {
        let mut visited = vec![false; self.grid.area()];
        self.flood_fill_unvisited(start_tile, &mut visited, check_tile)
    }

    fn flood_fill_unvisited(
        &self,
        start_tile: Tile,
        visited: &mut [bool],
        check_tile: impl Fn(Tile, Tile) -> bool,
    ) -> Vec<Tile> {
        // Store all the tiles that need to check whether their neighbors are in the current body within the following 'while {..}' loop.
        let mut queue = VecDeque::new();
        let mut tiles_in_body = Vec::new();

        visited[start_tile.index()] = true;
        queue.push_back(start_tile);

        while let Some(current_tile) = queue.pop_front() {
            tiles_in_body.push(current_tile);
            for tile in current_tile.cardinal_neighbor_tiles(self.grid) {
                // NOTICE: Don't switch the order of `visited` and `check_tile`.
                if !visited[tile.index()] && check_tile(tile, current_tile) {
                    visited[tile.index()] = true;
                    queue.push_back(tile);
                }
            }
        }

        tiles_in_body
    }

    /// Splits the tiles matching `predicate` into cardinally connected bodies.
    ///
    /// Bodies are ordered by their first tile in row-major order.
    pub fn connected_bodies(&self, predicate: impl Fn(Tile) -> bool) -> Vec<Vec<Tile>> {
        let mut visited = vec![false; self.grid.area()];
        let mut bodies = Vec::new();

        for tile in self.all_tiles() {
            if visited[tile.index()] || !predicate(tile) {
                continue;
            }
            bodies.push(self.flood_fill_unvisited(tile, &mut visited, |tile, _| predicate(tile)));
        }

        bodies
    }

    /// Breadth-first distance of every tile to the nearest tile matching `is_source`.
    ///
    /// Steps go through the 8 neighbours and only enter tiles matching `is_passable`.
    /// Unreachable tiles get [`u32::MAX`].
    pub fn distance_map(
        &self,
        is_source: impl Fn(Tile) -> bool,
        is_passable: impl Fn(Tile) -> bool,
    ) -> Vec<u32> {
        let mut distance = vec![u32::MAX; self.grid.area()];
        let mut queue = VecDeque::new();

        for tile in self.all_tiles().filter(|&tile| is_source(tile)) {
            distance[tile.index()] = 0;
            queue.push_back(tile);
        }

        while let Some(current_tile) = queue.pop_front() {
            let next_distance = distance[current_tile.index()] + 1;
            for tile in current_tile.neighbor_tiles(self.grid) {
                if distance[tile.index()] == u32::MAX && is_passable(tile) {
                    distance[tile.index()] = next_distance;
                    queue.push_back(tile);
                }
            }
        }

        distance
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::TileMap;
    use crate::{
        map_parameters::MapParameters,
        tile::Tile,
        tile_component::Terrain,
    };

    pub(crate) fn blank_map(width: u32, height: u32) -> TileMap {
        TileMap::new(&MapParameters::with_size(width, height), "test")
    }

    /// Turns every tile whose character in `rows` is `#` into grassland.
    pub(crate) fn map_from_rows(rows: &[&str]) -> TileMap {
        let mut tile_map = blank_map(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, character) in row.chars().enumerate() {
                if character == '#' {
                    let tile = Tile::new(y * rows[0].len() + x);
                    tile.set_terrain(&mut tile_map, Terrain::Grassland);
                }
            }
        }
        tile_map
    }

    #[test]
    fn levels_follow_land_percent() {
        let tile_map = blank_map(20, 20);
        assert_eq!(tile_map.shore_level, 700);
        assert_eq!(tile_map.low_level, 760);
        assert_eq!(tile_map.mountain_level, 910);
    }

    #[test]
    fn connected_bodies_use_cardinal_steps() {
        let tile_map = map_from_rows(&["##..", "....", "..#.", "...#"]);
        let bodies = tile_map.connected_bodies(|tile| tile.is_land(&tile_map));
        let sizes: Vec<usize> = bodies.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn distance_map_counts_steps() {
        let tile_map = map_from_rows(&["#...", "....", "....", "...."]);
        let distance = tile_map.distance_map(|tile| tile.is_land(&tile_map), |_| true);
        assert_eq!(distance[0], 0);
        assert_eq!(distance[5], 1);
        assert_eq!(distance[15], 3);
    }
}
