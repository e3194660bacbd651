use std::cmp::Reverse;

use enum_map::{EnumMap, enum_map};

use crate::{
    height_map::MAX_HEIGHT,
    tile::Tile,
    tile_component::{TemperatureBand, TemperatureMask, Terrain, WetnessClass},
    tile_map::TileMap,
};

/// Terrain given to land by its climate when no other step has placed anything on it.
pub type ClimateTable = EnumMap<TemperatureBand, EnumMap<WetnessClass, Terrain>>;

pub fn climate_table() -> ClimateTable {
    enum_map! {
        TemperatureBand::Frozen => enum_map! {
            WetnessClass::Dry => Terrain::Glacier,
            WetnessClass::Normal => Terrain::Glacier,
            WetnessClass::Wet => Terrain::Tundra,
        },
        TemperatureBand::Cold => enum_map! {
            WetnessClass::Dry => Terrain::Tundra,
            WetnessClass::Normal => Terrain::Plains,
            WetnessClass::Wet => Terrain::Tundra,
        },
        TemperatureBand::Temperate => enum_map! {
            WetnessClass::Dry => Terrain::Plains,
            WetnessClass::Normal => Terrain::Grassland,
            WetnessClass::Wet => Terrain::Grassland,
        },
        TemperatureBand::Tropical => enum_map! {
            WetnessClass::Dry => Terrain::Desert,
            WetnessClass::Normal => Terrain::Plains,
            WetnessClass::Wet => Terrain::Grassland,
        },
    }
}

impl TileMap {
    /// Raises the relief, then gives every remaining land tile the terrain of its climate.
    pub fn make_land(&mut self) {
        self.make_relief();

        let table = climate_table();
        for tile in self.all_tiles() {
            if tile.is_land(self) && !tile.is_placed(self) {
                let terrain = table[tile.temperature_band(self)][tile.wetness_class(self)];
                tile.set_terrain(self, terrain);
            }
        }
    }

    /// Turns high or locally prominent land into hills and mountains.
    ///
    /// A tile qualifies when it is above the mountain level and either stands out from no
    /// neighbour too sharply or wins a 40% draw, or when it is the highest point of a flat
    /// area. At most `mountain%` of the land is converted; if more tiles qualify, the highest
    /// ones are kept. Hot tiles become hills 60% of the time, others become mountains 80% of
    /// the time. Converted tiles are marked as placed.
    pub fn make_relief(&mut self) {
        let mountain_level = self.mountain_level;
        let budget = self.land_tile_count() * self.terrain_percentages.mountain as usize / 100;

        let mut candidates = Vec::new();
        for tile in self.all_tiles() {
            if !tile.is_land(self) || tile.is_placed(self) {
                continue;
            }
            let height = tile.height(self);
            let steep = height > mountain_level
                && (self.random_number_generator.rand_below(10) > 5
                    || !self.terrain_is_too_high(tile, height));
            if steep || self.area_is_too_flat(tile, height) {
                candidates.push(tile);
            }
        }

        if candidates.len() > budget {
            candidates.sort_by_key(|tile| Reverse(tile.height(self)));
            candidates.truncate(budget);
        }

        for &tile in &candidates {
            let draw = self.random_number_generator.rand_below(10);
            let terrain = if TemperatureMask::HOT.includes(tile.temperature_band(self)) {
                if draw < 4 { Terrain::Mountains } else { Terrain::Hills }
            } else if draw < 8 {
                Terrain::Mountains
            } else {
                Terrain::Hills
            };
            tile.set_terrain(self, terrain);
            tile.set_placed(self, true);
        }

        tracing::debug!(highlands = candidates.len(), budget, "relief made");
    }

    /// Whether some neighbour is much lower than `height`.
    fn terrain_is_too_high(&self, tile: Tile, height: u32) -> bool {
        let margin = (MAX_HEIGHT - self.mountain_level) / 5;
        tile.neighbor_tiles(self.grid)
            .iter()
            .any(|neighbor| neighbor.height(self) + margin < height)
    }

    /// Whether `tile` is the top of an area that has no hills at all.
    fn area_is_too_flat(&self, tile: Tile, height: u32) -> bool {
        let grid = self.grid;
        let mut higher_than_me = 0;
        for other in tile.tiles_in_distance(2, grid) {
            let other_height = other.height(self);
            if other_height > self.mountain_level {
                return false;
            }
            if other_height > height {
                if tile.distance_to(other, grid) == 1 {
                    return false;
                }
                higher_than_me += 1;
                if higher_than_me > 2 {
                    return false;
                }
            }
        }

        let hill_span = self.mountain_level as i64 - self.shore_level as i64;
        let my_span = height as i64 - self.shore_level as i64;
        hill_span * higher_than_me <= my_span * 4
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tile::Tile,
        tile_component::Terrain,
        tile_map::{TemperatureStage, tests::blank_map},
    };

    #[test]
    fn relief_respects_the_mountain_budget() {
        let mut tile_map = blank_map(20, 20);
        for tile in tile_map.all_tiles() {
            tile.set_terrain(&mut tile_map, Terrain::Grassland);
            let [x, y] = tile.to_offset(tile_map.grid).to_array();
            let distance = (x - 10).abs().max((y - 10).abs()) as u32;
            tile_map.height_list[tile.index()] = 1000 - distance * 10;
        }
        tile_map.generate_temperature_map(TemperatureStage::Final);
        tile_map.generate_wetness_map(50);
        tile_map.make_land();

        let highlands = tile_map
            .terrain_list
            .iter()
            .filter(|terrain| terrain.is_highland())
            .count();
        assert!(highlands <= 400 * 25 / 100);
        assert!(Tile::new(10 * 20 + 10).terrain(&tile_map).is_highland());
        assert!(Tile::new(10 * 20 + 10).is_placed(&tile_map));
    }

    #[test]
    fn climate_table_fills_the_rest() {
        let mut tile_map = blank_map(20, 20);
        tile_map.terrain_percentages.mountain = 0;
        for tile in tile_map.all_tiles() {
            tile.set_terrain(&mut tile_map, Terrain::Plains);
            tile_map.height_list[tile.index()] = 800;
        }
        tile_map.generate_temperature_map(TemperatureStage::Provisional);
        tile_map.generate_wetness_map(50);
        tile_map.make_land();

        assert_eq!(Tile::new(0).terrain(&tile_map), Terrain::Glacier);
        assert!(!Tile::new(0).is_placed(&tile_map));
        assert!(tile_map.terrain_list.iter().all(|terrain| !terrain.is_highland()));
    }
}
