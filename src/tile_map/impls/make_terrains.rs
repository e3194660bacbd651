use rand::seq::IndexedRandom;

use crate::{
    height_map::MAX_HEIGHT,
    tile::Tile,
    tile_component::{
        ElevationCondition, TemperatureBand, TemperatureMask, Terrain, WetnessCondition,
    },
    tile_map::TileMap,
};

/// Where a terrain may grow, and how far a single clump of it may spread.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRule {
    pub terrain: Terrain,
    pub temperature: TemperatureMask,
    pub wetness: WetnessCondition,
    pub elevation: ElevationCondition,
    /// Spreading budget of a clump. Every step away from the seed costs at least `1`.
    pub weight: i64,
}

pub const FOREST_RULE: PlacementRule = PlacementRule {
    terrain: Terrain::Forest,
    temperature: TemperatureMask::NOT_FROZEN,
    wetness: WetnessCondition::All,
    elevation: ElevationCondition::Any,
    weight: 60,
};

pub const JUNGLE_RULE: PlacementRule = PlacementRule {
    terrain: Terrain::Jungle,
    temperature: TemperatureMask::TROPICAL,
    wetness: WetnessCondition::All,
    elevation: ElevationCondition::Any,
    weight: 50,
};

pub const SWAMP_RULE: PlacementRule = PlacementRule {
    terrain: Terrain::Swamp,
    temperature: TemperatureMask::HOT,
    wetness: WetnessCondition::NotDry,
    elevation: ElevationCondition::Low,
    weight: 50,
};

pub const DESERT_RULE: PlacementRule = PlacementRule {
    terrain: Terrain::Desert,
    temperature: TemperatureMask::NOT_FROZEN,
    wetness: WetnessCondition::Dry,
    elevation: ElevationCondition::NotLow,
    weight: 80,
};

/// Desert that did not fit the dry land spreads over any climate that is not frozen.
pub const ALT_DESERT_RULE: PlacementRule = PlacementRule {
    terrain: Terrain::Desert,
    temperature: TemperatureMask::NOT_FROZEN,
    wetness: WetnessCondition::All,
    elevation: ElevationCondition::NotLow,
    weight: 40,
};

/// Random draws made before scanning the whole map for an unplaced tile.
const RANDOM_TRIES: u32 = 50;

impl TileMap {
    /// Places forest, jungle, swamp, desert and plains on every land tile not placed yet.
    ///
    /// Each terrain receives its share of the unplaced land from the effective
    /// percentages; plains take the remainder. Terrains are laid down in clumps, one clump
    /// per terrain per round, until every share is spent. A terrain that finds no tile
    /// with a matching climate gives its remaining share to an alternate: jungle and swamp
    /// to forest, forest to plains, desert to the relaxed desert rule and that one to
    /// plains. After this step every land tile is placed.
    pub fn make_terrains(&mut self) {
        let total = self
            .all_tiles()
            .filter(|tile| tile.is_land(self) && !tile.is_placed(self))
            .count() as i64;
        if total == 0 {
            return;
        }

        let percentages = self.terrain_percentages;
        let free_share = 100 - percentages.mountain as i64;
        let share = |percent: u32| total * percent as i64 / free_share;

        let mut forest = share(percentages.forest);
        let mut jungle = share(percentages.jungle);
        let mut swamp = share(percentages.swamp);
        let mut desert = share(percentages.desert);
        let mut alt_desert = 0;
        let mut plains = (total - forest - jungle - swamp - desert).max(0);

        tracing::debug!(total, forest, jungle, swamp, desert, plains, "terrain shares");

        while forest > 0 || jungle > 0 || swamp > 0 || desert > 0 || alt_desert > 0 || plains > 0
        {
            self.place_one_type(&FOREST_RULE, &mut forest, &mut plains);
            self.place_one_type(&JUNGLE_RULE, &mut jungle, &mut forest);
            self.place_one_type(&SWAMP_RULE, &mut swamp, &mut forest);
            self.place_one_type(&DESERT_RULE, &mut desert, &mut alt_desert);
            self.place_one_type(&ALT_DESERT_RULE, &mut alt_desert, &mut plains);

            if plains > 0 {
                match self.random_unplaced_land(|_, _| true) {
                    Some(tile) => self.make_plain(tile, &mut plains),
                    None => plains = 0,
                }
            }
        }
    }

    /// Places one clump of `rule.terrain`, or moves the whole `count` to `alternate` when no
    /// unplaced tile matches the rule.
    fn place_one_type(&mut self, rule: &PlacementRule, count: &mut i64, alternate: &mut i64) {
        if *count <= 0 {
            return;
        }
        match self.random_unplaced_land(|tile_map, tile| tile_map.matches_rule(tile, rule)) {
            Some(tile) => self.place_terrain(tile, rule, count),
            None => {
                *alternate += *count;
                *count = 0;
            }
        }
    }

    /// Grows a clump of `rule.terrain` from `start` over cardinal neighbours.
    ///
    /// A neighbour joins when it matches the rule, its latitude and height differ little
    /// enough from the tile it is reached from, and a coin flip succeeds. The spreading
    /// budget shrinks with every step and with every difference.
    fn place_terrain(&mut self, start: Tile, rule: &PlacementRule, count: &mut i64) {
        let grid = self.grid;
        let latitude_unit = (1000 / grid.height()).max(1) as i64;
        let height_unit = ((MAX_HEIGHT - self.shore_level) / 100).max(1) as i64;

        let mut stack = vec![(start, rule.weight)];
        while let Some((tile, budget)) = stack.pop() {
            if *count <= 0 {
                return;
            }
            if tile.is_placed(self) {
                continue;
            }
            tile.set_terrain(self, rule.terrain);
            tile.set_placed(self, true);
            *count -= 1;

            for neighbor in tile.cardinal_neighbor_tiles(grid) {
                let delta = (neighbor.colatitude(grid) as i64 - tile.colatitude(grid) as i64).abs()
                    / latitude_unit
                    + (neighbor.height(self) as i64 - tile.height(self) as i64).abs() / height_unit;
                if neighbor.is_land(self)
                    && !neighbor.is_placed(self)
                    && self.matches_rule(neighbor, rule)
                    && delta < budget
                    && self.random_number_generator.rand_below(10) > 4
                {
                    stack.push((neighbor, budget - 1 - delta));
                }
            }
        }
    }

    fn make_plain(&mut self, tile: Tile, count: &mut i64) {
        let terrain = self.plain_terrain(tile);
        tile.set_terrain(self, terrain);
        tile.set_placed(self, true);
        *count -= 1;
    }

    /// Returns the plain terrain of the tile's climate: glacier, tundra, or grassland and
    /// plains in equal measure.
    pub fn plain_terrain(&mut self, tile: Tile) -> Terrain {
        match tile.temperature_band(self) {
            TemperatureBand::Frozen => Terrain::Glacier,
            TemperatureBand::Cold => Terrain::Tundra,
            _ => {
                if self.random_number_generator.rand_below(2) == 0 {
                    Terrain::Grassland
                } else {
                    Terrain::Plains
                }
            }
        }
    }

    fn matches_rule(&self, tile: Tile, rule: &PlacementRule) -> bool {
        let elevation_matches = match rule.elevation {
            ElevationCondition::Any => true,
            ElevationCondition::Low => tile.height(self) < self.low_level,
            ElevationCondition::NotLow => tile.height(self) >= self.low_level,
        };
        rule.temperature.includes(tile.temperature_band(self))
            && rule.wetness.accepts(tile.wetness_class(self))
            && elevation_matches
    }

    /// Picks a random unplaced land tile accepted by `filter`.
    ///
    /// A few random tiles are tried first; if none fits, one is chosen among all the
    /// tiles that fit.
    fn random_unplaced_land(&mut self, filter: impl Fn(&Self, Tile) -> bool) -> Option<Tile> {
        let accepts = |tile_map: &Self, tile: Tile| {
            tile.is_land(tile_map) && !tile.is_placed(tile_map) && filter(tile_map, tile)
        };

        let area = self.grid.area() as u32;
        for _ in 0..RANDOM_TRIES {
            let tile = Tile::new(self.random_number_generator.rand_below(area) as usize);
            if accepts(self, tile) {
                return Some(tile);
            }
        }

        let candidates: Vec<Tile> = self.all_tiles().filter(|&tile| accepts(self, tile)).collect();
        candidates.choose(&mut self.random_number_generator).copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        tile_component::{TemperatureBand, Terrain},
        tile_map::{TemperatureStage, TileMap, tests::blank_map},
    };

    fn land_map() -> TileMap {
        let mut tile_map = blank_map(20, 20);
        for tile in tile_map.all_tiles() {
            tile.set_terrain(&mut tile_map, Terrain::Grassland);
            tile_map.height_list[tile.index()] = 750 + (tile.index() as u32 * 7) % 200;
        }
        tile_map.generate_temperature_map(TemperatureStage::Final);
        tile_map.generate_wetness_map(50);
        tile_map
    }

    #[test]
    fn every_land_tile_is_placed() {
        let mut tile_map = land_map();
        tile_map.make_terrains();

        assert!(tile_map.placed_list.iter().all(|&placed| placed));
        let forests = tile_map
            .terrain_list
            .iter()
            .filter(|&&terrain| terrain == Terrain::Forest)
            .count();
        assert!(forests > 0);
    }

    #[test]
    fn frozen_land_only_grows_glacier() {
        let mut tile_map = land_map();
        tile_map.temperature_band_list.fill(TemperatureBand::Frozen);
        tile_map.make_terrains();

        assert!(tile_map.terrain_list.iter().all(|&terrain| terrain == Terrain::Glacier));
    }

    #[test]
    fn placed_tiles_are_left_alone() {
        let mut tile_map = land_map();
        for index in 0..20 {
            tile_map.terrain_list[index] = Terrain::Mountains;
            tile_map.placed_list[index] = true;
        }
        tile_map.make_terrains();

        assert!(tile_map.terrain_list[..20].iter().all(|&terrain| terrain == Terrain::Mountains));
    }
}
