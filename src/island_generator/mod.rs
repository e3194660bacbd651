//! Land built as a sequence of islands instead of a height map.
//!
//! Every island is grown as a shape, dropped at a random free spot of the map and typed
//! right away, so the terrain mix of the world stays proportional to the land placed so far.
//! The layouts in [`layout`] decide how many islands of which size are requested, and
//! [`fair`] stamps identical islands for every player.

use std::collections::HashSet;

use glam::IVec2;

use crate::{
    grid::OffsetCoordinate,
    height_map::MAX_HEIGHT,
    tile::Tile,
    tile_component::{TemperatureMask, Terrain},
    tile_map::TileMap,
};

pub mod fair;
pub mod layout;
pub mod shape;

pub use layout::{IslandRequest, island_plan, resolve_layout};
pub use shape::{IslandBounds, IslandShape};

/// Heights of an island rise over this many tiles from its coast.
pub(crate) const COAST_TO_PEAK_STEPS: u32 = 6;

/// Running totals shared by every island of one generation.
#[derive(Debug, Clone)]
pub struct GenerationState {
    /// Land mass the layout distributes between islands.
    pub total_mass: u32,
    /// Land mass not placed yet. No island may place more.
    pub unplaced_mass: i64,
    /// Continent ID given to the next island.
    pub isle_index: u32,
    /// Bounds of the last island placed, in map coordinates.
    pub bounds: IslandBounds,
    /// Tiles claimed by the islands placed so far.
    pub claimed: HashSet<Tile>,
    buckets: TerrainBuckets,
    tile_factor: i64,
    /// Tiles the last island placed beyond its request, taken off the next one.
    balance: i64,
    last_placed: i64,
}

/// Fractional terrain counts carried from island to island.
#[derive(Debug, Clone, Copy)]
struct TerrainBuckets {
    river: i64,
    forest: i64,
    desert: i64,
    swamp: i64,
    mountain: i64,
}

impl GenerationState {
    /// Starts a generation of `total_mass` land tiles.
    ///
    /// Every terrain bucket starts at a random negative value so small islands do not all
    /// receive the same terrains.
    pub fn new(tile_map: &mut TileMap, total_mass: u32) -> Self {
        let random_number_generator = &mut tile_map.random_number_generator;
        let mut draw = || -(random_number_generator.rand_below(total_mass) as i64);
        let buckets = TerrainBuckets {
            river: draw(),
            forest: draw(),
            desert: draw(),
            swamp: draw(),
            mountain: draw(),
        };

        let land_sum = tile_map.terrain_percentages.land_sum() as i64;
        let divisor = if land_sum <= 90 { 100 } else { land_sum * 11 / 10 };

        Self {
            total_mass,
            unplaced_mass: total_mass as i64,
            isle_index: 1,
            bounds: IslandBounds {
                north: 0,
                south: 1,
                west: 0,
                east: 1,
            },
            claimed: HashSet::new(),
            buckets,
            tile_factor: total_mass as i64 / divisor,
            balance: 0,
            last_placed: total_mass as i64,
        }
    }

    /// Takes the whole terrain count out of `bucket`: `bucket / total_mass + 1` tiles once
    /// it is positive, none otherwise.
    fn take_from_bucket(bucket: &mut i64, total_mass: u32) -> i64 {
        if *bucket <= 0 || total_mass == 0 {
            return 0;
        }
        let count = *bucket / total_mass as i64 + 1;
        *bucket -= count * total_mass as i64;
        count
    }
}

/// A terrain an island fill may choose, and the climates it may grow in.
#[derive(Debug, Clone, Copy)]
struct IslandTerrain {
    terrain: Terrain,
    temperature: TemperatureMask,
    weight: u32,
}

const FOREST_TERRAINS: &[IslandTerrain] = &[
    IslandTerrain {
        terrain: Terrain::Forest,
        temperature: TemperatureMask::NOT_FROZEN,
        weight: 3,
    },
    IslandTerrain {
        terrain: Terrain::Jungle,
        temperature: TemperatureMask::TROPICAL,
        weight: 2,
    },
];

const DESERT_TERRAINS: &[IslandTerrain] = &[
    IslandTerrain {
        terrain: Terrain::Desert,
        temperature: TemperatureMask::HOT,
        weight: 3,
    },
    IslandTerrain {
        terrain: Terrain::Tundra,
        temperature: TemperatureMask::COLD,
        weight: 1,
    },
    IslandTerrain {
        terrain: Terrain::Glacier,
        temperature: TemperatureMask::FROZEN,
        weight: 1,
    },
];

const SWAMP_TERRAINS: &[IslandTerrain] = &[IslandTerrain {
    terrain: Terrain::Swamp,
    temperature: TemperatureMask::NOT_FROZEN,
    weight: 1,
}];

const MOUNTAIN_TERRAINS: &[IslandTerrain] = &[
    IslandTerrain {
        terrain: Terrain::Mountains,
        temperature: TemperatureMask::all(),
        weight: 2,
    },
    IslandTerrain {
        terrain: Terrain::Hills,
        temperature: TemperatureMask::all(),
        weight: 2,
    },
];

impl TileMap {
    /// Grows, places and types one island of about `target_mass` tiles.
    ///
    /// The request is first corrected by the surplus of the previous island and capped so
    /// islands shrink gradually and always fit the map. When no shape of the requested size
    /// can be placed the size shrinks one tile at a time; the island fails once it would be
    /// smaller than `min_size_percent` of the request.
    ///
    /// `player_slots` is the number of players the island is meant for. It only shows in the
    /// logs, because starting positions are chosen over the finished map.
    pub fn place_island(
        &mut self,
        state: &mut GenerationState,
        target_mass: u32,
        player_slots: u32,
        min_size_percent: u32,
    ) -> bool {
        let width = self.grid.width() as i64;
        let height = self.grid.height() as i64;

        let mass = (target_mass as i64 - state.balance)
            .min(state.last_placed + 1 + state.last_placed / 50)
            .min((height - 6).pow(2))
            .min((width - 2).pow(2));
        if mass <= 0 {
            return false;
        }

        let smallest = (mass * min_size_percent as i64 / 100).max(1);
        let mut size = mass;
        let tiles = loop {
            if let Some(tiles) = self.create_island(size as u32, state) {
                break tiles;
            }
            size -= 1;
            if size < smallest {
                tracing::trace!(mass, player_slots, "island did not fit");
                return false;
            }
        };

        let placed = tiles.len() as i64;
        state.last_placed = placed;
        state.balance = if placed * 10 > mass { placed - mass } else { 0 };

        self.raise_island(&tiles);
        self.fill_island_rivers(&tiles, state);
        self.fill_island_terrains(&tiles, state);

        tracing::debug!(
            island = state.isle_index,
            requested = target_mass,
            placed,
            player_slots,
            "island placed"
        );
        state.isle_index += 1;
        true
    }

    /// Grows a shape of `size` cells and tries to drop it at a free spot.
    ///
    /// Returns the claimed tiles, or `None` when the shape could not be grown or placed.
    fn create_island(&mut self, size: u32, state: &mut GenerationState) -> Option<Vec<Tile>> {
        let shape = IslandShape::grow(self.grid, size, &mut self.random_number_generator)?;
        let tries = (self.grid.area() / 4).max(1);
        (0..tries).find_map(|_| self.try_place_shape(&shape, state))
    }

    /// Moves `shape` so its centre lands on a random tile, and claims its tiles if every one
    /// of them keeps a tile of distance from the map edge and from other islands.
    fn try_place_shape(&mut self, shape: &IslandShape, state: &mut GenerationState) -> Option<Vec<Tile>> {
        let grid = self.grid;
        let width = grid.width() as i32;
        let height = grid.height() as i32;

        let target = IVec2::new(
            self.random_number_generator.rand_below(width as u32) as i32,
            self.random_number_generator.rand_below(height as u32) as i32,
        );
        let offset = target - IVec2::new(width / 2, height / 2);
        let bounds = shape.bounds().translate(offset);
        if bounds.west < 1 || bounds.north < 1 || bounds.east > width - 1 || bounds.south > height - 1 {
            return None;
        }

        let mut tiles = Vec::new();
        for cell in shape.cells() {
            let tile = Tile::from_offset(OffsetCoordinate(cell + offset), grid)?;
            if state.claimed.contains(&tile)
                || tile
                    .neighbor_tiles(grid)
                    .iter()
                    .any(|neighbor| state.claimed.contains(neighbor))
            {
                return None;
            }
            tiles.push(tile);
        }

        let mut claimed = Vec::with_capacity(tiles.len());
        for tile in tiles {
            if state.unplaced_mass <= 0 {
                break;
            }
            let newly_claimed = state.claimed.insert(tile);
            debug_assert!(newly_claimed, "tile {tile:?} claimed twice");
            state.unplaced_mass -= 1;

            tile.set_terrain(self, Terrain::Grassland);
            tile.set_placed(self, false);
            self.continent_id_list[tile.index()] = state.isle_index;
            claimed.push(tile);
        }
        state.bounds = bounds;

        (!claimed.is_empty()).then_some(claimed)
    }

    /// Gives the island heights rising from just above the shore at its coast.
    fn raise_island(&mut self, tiles: &[Tile]) {
        let island: HashSet<Tile> = tiles.iter().copied().collect();
        let grid = self.grid;
        let distance = self.distance_map(
            |tile| {
                island.contains(&tile)
                    && tile
                        .cardinal_neighbor_tiles(grid)
                        .iter()
                        .any(|neighbor| !island.contains(neighbor))
            },
            |tile| island.contains(&tile),
        );

        let shore_level = self.shore_level;
        let step = (MAX_HEIGHT - shore_level) / (COAST_TO_PEAK_STEPS + 1);
        for &tile in tiles {
            let rise = distance[tile.index()].min(COAST_TO_PEAK_STEPS);
            let noise = self.random_number_generator.rand_below(step / 2 + 1);
            self.height_list[tile.index()] = (shore_level + step * rise + noise).min(MAX_HEIGHT);
        }
    }

    /// Runs the island's share of rivers from random springs inside it.
    ///
    /// Rivers never leave the island, so they always end in the sea or in another river.
    fn fill_island_rivers(&mut self, tiles: &[Tile], state: &mut GenerationState) {
        let placed = tiles.len() as i64;
        state.buckets.river +=
            self.terrain_percentages.river as i64 * placed * state.tile_factor;
        let count = GenerationState::take_from_bucket(&mut state.buckets.river, state.total_mass);
        if count == 0 {
            return;
        }

        let island: HashSet<Tile> = tiles.iter().copied().collect();
        let mut remaining = count * 175 / 100;
        let mut failsafe = count * tiles.len() as i64 * 5;
        while remaining > 0 && failsafe > 0 {
            failsafe -= 1;
            let Some(&spring) = tiles.get(self.random_number_generator.rand_below(tiles.len() as u32) as usize)
            else {
                return;
            };
            if spring.has_river(self) || !self.is_river_source(spring) {
                continue;
            }
            if let Some(path) = self.route_river(spring, |tile| island.contains(&tile)) {
                remaining -= path.tile_count() as i64;
                self.apply_river_path(&path);
            }
        }
    }

    /// Types the island: forest, desert, swamp and relief passes, then plain terrain for the
    /// tiles still left.
    fn fill_island_terrains(&mut self, tiles: &[Tile], state: &mut GenerationState) {
        let placed = tiles.len() as i64;
        let percentages = self.terrain_percentages;
        let tile_factor = state.tile_factor;
        let buckets = &mut state.buckets;
        buckets.forest += (percentages.forest + percentages.jungle) as i64 * placed * tile_factor;
        buckets.desert += percentages.desert as i64 * placed * tile_factor;
        buckets.swamp += percentages.swamp as i64 * placed * tile_factor;
        buckets.mountain += percentages.mountain as i64 * placed * tile_factor;

        let total_mass = state.total_mass;
        let forest = GenerationState::take_from_bucket(&mut state.buckets.forest, total_mass);
        let desert = GenerationState::take_from_bucket(&mut state.buckets.desert, total_mass);
        let swamp = GenerationState::take_from_bucket(&mut state.buckets.swamp, total_mass);
        let mountain = GenerationState::take_from_bucket(&mut state.buckets.mountain, total_mass);

        self.fill_island(tiles, forest, 60, FOREST_TERRAINS);
        self.fill_island(tiles, desert, 40, DESERT_TERRAINS);
        self.fill_island(tiles, swamp, 50, SWAMP_TERRAINS);
        self.fill_island(tiles, mountain, 20, MOUNTAIN_TERRAINS);

        for &tile in tiles {
            if !tile.is_placed(self) {
                let terrain = self.plain_terrain(tile);
                tile.set_terrain(self, terrain);
                tile.set_placed(self, true);
            }
        }
    }

    /// Places `count` tiles of the given terrains on random unplaced island tiles.
    ///
    /// A terrain is drawn by weight and must suit the tile's climate. For the first third
    /// the tile is taken outright half of the time, then only next to the same terrain, which
    /// keeps terrains in clumps. Tiles touching the sea are accepted with `coast_percent`
    /// chance only.
    fn fill_island(
        &mut self,
        tiles: &[Tile],
        count: i64,
        coast_percent: u32,
        selections: &[IslandTerrain],
    ) {
        if count <= 0 || tiles.is_empty() {
            return;
        }
        let total_weight: u32 = selections.iter().map(|selection| selection.weight).sum();
        let grid = self.grid;

        let mut remaining = count;
        let mut failsafe = count * tiles.len() as i64;
        while remaining > 0 && failsafe > 0 {
            failsafe -= 1;
            let tile = tiles[self.random_number_generator.rand_below(tiles.len() as u32) as usize];
            if tile.is_placed(self) {
                continue;
            }
            let selection = selections[self.random_number_generator.rand_below(selections.len() as u32) as usize];
            if self.random_number_generator.rand_below(total_weight) > selection.weight {
                continue;
            }
            if !selection.temperature.includes(tile.temperature_band(self)) {
                continue;
            }

            let clumps = remaining * 3 > count * 2
                || self.random_number_generator.rand_below(100) < 50
                || tile
                    .neighbor_tiles(grid)
                    .iter()
                    .any(|neighbor| neighbor.terrain(self) == selection.terrain);
            let off_coast = !tile
                .cardinal_neighbor_tiles(grid)
                .iter()
                .any(|neighbor| neighbor.terrain(self).is_ocean())
                || self.random_number_generator.rand_below(100) < coast_percent;

            if clumps && off_coast {
                tile.set_terrain(self, selection.terrain);
                tile.set_placed(self, true);
                remaining -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationState;
    use crate::{
        map_parameters::MapParameters,
        tile_map::{TemperatureStage, TileMap, assert_rivers_connected},
    };

    fn island_map(seed: &str) -> TileMap {
        let mut tile_map = TileMap::new(&MapParameters::with_size(60, 40), seed);
        tile_map.generate_temperature_map(TemperatureStage::Provisional);
        tile_map
    }

    #[test]
    fn placed_island_claims_typed_land() {
        let mut tile_map = island_map("one island");
        let mut state = GenerationState::new(&mut tile_map, 400);
        assert!(tile_map.place_island(&mut state, 150, 1, 95));

        let land: Vec<_> = tile_map.all_tiles().filter(|tile| tile.is_land(&tile_map)).collect();
        assert_eq!(land.len(), state.claimed.len());
        assert!(land.len() as i64 >= 150 * 95 / 100);
        assert_eq!(state.unplaced_mass, 400 - land.len() as i64);
        for tile in &land {
            assert!(tile.is_placed(&tile_map));
            assert_eq!(tile.continent_id(&tile_map), 1);
            assert!(tile.height(&tile_map) >= tile_map.shore_level);
        }
        assert_eq!(state.isle_index, 2);
    }

    #[test]
    fn islands_never_touch() {
        let mut tile_map = island_map("archipelago");
        let grid = tile_map.grid;
        let mut state = GenerationState::new(&mut tile_map, 600);
        for _ in 0..6 {
            tile_map.place_island(&mut state, 60, 0, 0);
        }

        for tile in tile_map.all_tiles().filter(|tile| tile.is_land(&tile_map)) {
            let island = tile.continent_id(&tile_map);
            for neighbor in tile.neighbor_tiles(grid) {
                if neighbor.is_land(&tile_map) {
                    assert_eq!(neighbor.continent_id(&tile_map), island);
                }
            }
        }
        assert_rivers_connected(&tile_map);
    }

    #[test]
    fn unplaced_mass_caps_the_island() {
        let mut tile_map = island_map("capped");
        let mut state = GenerationState::new(&mut tile_map, 30);
        tile_map.place_island(&mut state, 100, 0, 0);
        assert!(state.claimed.len() <= 30);
        assert!(state.unplaced_mass >= 0);
    }
}
