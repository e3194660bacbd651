use arrayvec::ArrayVec;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::{
    grid::Direction,
    tile::Tile,
    tile_component::{RiverMask, TemperatureBand, Terrain, WetnessClass},
    tile_map::TileMap,
};

/// `river% * land tiles * 100 / RIVER_LENGTH_DIVISOR` is the total river length aimed for.
pub const RIVER_LENGTH_DIVISOR: u32 = 5325;
/// Number of spring passes. Each pass admits more kinds of spring tiles than the previous one.
const SPRING_PASSES: u32 = 5;

/// A river that reached water or another river, not yet written to the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiverPath {
    /// Every step of the river, as the tile it leaves and the direction it flows to.
    pub steps: Vec<(Tile, Direction)>,
    /// The last tile of the river and the direction of the water or river it flows into.
    pub mouth: (Tile, Direction),
}

impl RiverPath {
    /// Number of tiles the river runs through.
    pub fn tile_count(&self) -> usize {
        self.steps.len() + 1
    }
}

impl TileMap {
    /// Adds rivers until the total river length reaches its target or no spring is left.
    ///
    /// Springs are land tiles at or above the low level, shuffled once. They are tried in
    /// five passes; the first only accepts tiles below highland, and every later pass also
    /// admits hills, mountains, frozen tiles and dry tiles, in that order.
    pub fn add_rivers(&mut self) {
        let target = (self.terrain_percentages.river as usize * self.land_tile_count() * 100)
            / RIVER_LENGTH_DIVISOR as usize;
        let low_level = self.low_level;

        let mut springs: Vec<Tile> = self
            .all_tiles()
            .filter(|tile| tile.is_land(self) && tile.height(self) >= low_level)
            .collect();
        springs.shuffle(&mut self.random_number_generator);

        let mut length = 0;
        let mut rivers = 0;
        'passes: for pass in 0..SPRING_PASSES {
            for &spring in &springs {
                if length >= target {
                    break 'passes;
                }
                if !self.is_spring_allowed(spring, pass) {
                    continue;
                }
                if let Some(path) = self.route_river(spring, |_| true) {
                    length += path.tile_count();
                    rivers += 1;
                    self.apply_river_path(&path);
                }
            }
        }

        tracing::debug!(rivers, length, target, "rivers added");
    }

    fn is_spring_allowed(&self, tile: Tile, pass: u32) -> bool {
        if tile.has_river(self) || !self.is_river_source(tile) {
            return false;
        }

        let admitted_terrain = match tile.terrain(self) {
            Terrain::Hills => pass >= 1,
            Terrain::Mountains => pass >= 2,
            _ => true,
        };
        let admitted_climate = (tile.temperature_band(self) != TemperatureBand::Frozen || pass >= 3)
            && (tile.wetness_class(self) != WetnessClass::Dry || pass >= 4);
        let below_highland = pass > 0
            || tile
                .neighbor_tiles(self.grid)
                .iter()
                .filter(|neighbor| neighbor.terrain(self).is_highland())
                .count()
                >= 2;

        admitted_terrain && admitted_climate && below_highland
    }

    /// Whether a river may start on `tile`: at most one cardinal neighbour is water or river.
    pub fn is_river_source(&self, tile: Tile) -> bool {
        tile.cardinal_neighbor_tiles(self.grid)
            .iter()
            .filter(|neighbor| neighbor.is_water(self) || neighbor.has_river(self))
            .count()
            <= 1
    }

    /// Finds the course of a river starting at `spring`, without writing it.
    ///
    /// The river only enters land tiles accepted by `within`. At each tile it ends if a
    /// cardinal neighbour is water or a river. Otherwise the next tile is chosen among
    /// the cardinal land neighbours that are not blocked, keeping at each test only the
    /// candidates with the best score:
    ///
    /// 1. Not blocked, with at least one unblocked neighbour of its own.
    /// 2. Not crowded by more than one river.
    /// 3. Lowest height.
    /// 4. Fewest neighbouring hills and mountains.
    ///
    /// The remaining tie is broken at random. The tile left behind and its cardinal
    /// neighbours are then blocked. Returns `None` when the river gets stuck.
    pub fn route_river(&mut self, spring: Tile, within: impl Fn(Tile) -> bool) -> Option<RiverPath> {
        let grid = self.grid;
        let mut blocked = vec![false; grid.area()];
        let mut steps = Vec::new();
        let mut current = spring;

        loop {
            let outlet = Direction::CARDINAL.into_iter().find(|&direction| {
                current
                    .neighbor_tile(direction, grid)
                    .is_some_and(|neighbor| neighbor.is_water(self) || neighbor.has_river(self))
            });
            if let Some(direction) = outlet {
                return Some(RiverPath {
                    steps,
                    mouth: (current, direction),
                });
            }

            let mut candidates: ArrayVec<(Direction, Tile, [u32; 3]), 4> = Direction::CARDINAL
                .into_iter()
                .filter_map(|direction| {
                    current
                        .neighbor_tile(direction, grid)
                        .map(|neighbor| (direction, neighbor))
                })
                .filter(|&(_, neighbor)| neighbor.is_land(self) && within(neighbor))
                .filter(|&(_, neighbor)| !self.is_river_blocked(neighbor, &blocked))
                .map(|(direction, neighbor)| (direction, neighbor, self.river_step_scores(neighbor)))
                .collect();

            for test in 0..3 {
                let Some(best) = candidates.iter().map(|(_, _, scores)| scores[test]).min() else {
                    break;
                };
                candidates.retain(|(_, _, scores)| scores[test] == best);
            }

            let &(direction, next, _) = candidates.choose(&mut self.random_number_generator)?;

            blocked[current.index()] = true;
            for neighbor in current.cardinal_neighbor_tiles(grid) {
                blocked[neighbor.index()] = true;
            }

            steps.push((current, direction));
            current = next;
        }
    }

    /// Writes a river: every step connects both of its tiles, and the mouth connects the
    /// last tile to the water or river it flows into. Water never receives river bits.
    pub fn apply_river_path(&mut self, path: &RiverPath) {
        let grid = self.grid;
        let connect = |tile_map: &mut Self, tile: Tile, direction: Direction| {
            tile_map.river_mask_list[tile.index()] |= RiverMask::from_direction(direction);
            if let Some(neighbor) = tile.neighbor_tile(direction, grid) {
                if neighbor.is_land(tile_map) {
                    tile_map.river_mask_list[neighbor.index()] |=
                        RiverMask::from_direction(direction.opposite_direction());
                }
            }
        };

        for &(tile, direction) in &path.steps {
            connect(self, tile, direction);
        }
        let (tile, direction) = path.mouth;
        connect(self, tile, direction);
    }

    fn is_river_blocked(&self, tile: Tile, blocked: &[bool]) -> bool {
        blocked[tile.index()]
            || tile
                .cardinal_neighbor_tiles(self.grid)
                .iter()
                .all(|neighbor| blocked[neighbor.index()])
    }

    /// Scores of a candidate river step, lower is better: crowding by other rivers, height,
    /// and neighbouring highland.
    fn river_step_scores(&self, tile: Tile) -> [u32; 3] {
        let crowding = tile
            .cardinal_neighbor_tiles(self.grid)
            .iter()
            .filter(|neighbor| neighbor.has_river(self))
            .count();
        let highlands = tile
            .neighbor_tiles(self.grid)
            .iter()
            .filter(|neighbor| neighbor.terrain(self).is_highland())
            .count();
        [u32::from(crowding > 1), tile.height(self), highlands as u32]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        grid::Direction,
        tile::Tile,
        tile_component::{RiverMask, Terrain},
        tile_map::{TemperatureStage, TileMap, tests::map_from_rows},
    };

    /// Checks that every river bit points at water or at a river tile pointing back.
    pub(crate) fn assert_rivers_connected(tile_map: &TileMap) {
        let grid = tile_map.grid;
        for tile in tile_map.all_tiles() {
            let mask = tile.river_mask(tile_map);
            if mask.is_empty() {
                continue;
            }
            assert!(tile.is_land(tile_map), "river bits on water at {tile:?}");
            for direction in mask.directions() {
                let neighbor = tile
                    .neighbor_tile(direction, grid)
                    .unwrap_or_else(|| panic!("river at {tile:?} flows off the map"));
                let back = RiverMask::from_direction(direction.opposite_direction());
                assert!(
                    neighbor.is_water(tile_map) || neighbor.river_mask(tile_map).contains(back),
                    "river at {tile:?} is not connected towards {direction:?}"
                );
            }
        }
    }

    /// A land strip sloping down to the sea on the right.
    fn slope() -> TileMap {
        let row = "###########...";
        let mut tile_map = map_from_rows(&[row; 5]);
        for tile in tile_map.all_tiles() {
            let x = tile.to_offset(tile_map.grid).x() as u32;
            tile_map.height_list[tile.index()] = 1000 - x * 20;
        }
        tile_map
    }

    #[test]
    fn river_flows_downhill_into_the_sea() {
        let mut tile_map = slope();
        let spring = Tile::new(2 * 14);
        let path = tile_map.route_river(spring, |_| true).unwrap();

        assert_eq!(path.tile_count(), 11);
        assert!(path.steps.iter().all(|&(_, direction)| direction == Direction::East));
        assert_eq!(path.mouth, (Tile::new(2 * 14 + 10), Direction::East));

        tile_map.apply_river_path(&path);
        assert_eq!(tile_map.river_tile_count(), 11);
        assert_eq!(spring.river_mask(&tile_map), RiverMask::EAST);
        assert!(Tile::new(2 * 14 + 11).river_mask(&tile_map).is_empty());
        assert_rivers_connected(&tile_map);
    }

    #[test]
    fn river_joins_an_existing_river() {
        let mut tile_map = slope();
        let first = tile_map.route_river(Tile::new(2 * 14), |_| true).unwrap();
        tile_map.apply_river_path(&first);

        let second = tile_map.route_river(Tile::new(4), |_| true).unwrap();
        tile_map.apply_river_path(&second);

        assert_rivers_connected(&tile_map);
        let (mouth, direction) = second.mouth;
        let joined = mouth.neighbor_tile(direction, tile_map.grid).unwrap();
        assert!(joined.is_water(&tile_map) || first.steps.iter().any(|&(tile, _)| tile == joined));
    }

    #[test]
    fn river_outside_its_island_gets_stuck() {
        let mut tile_map = slope();
        assert!(tile_map.route_river(Tile::new(2 * 14), |tile| tile == Tile::new(2 * 14)).is_none());
    }

    #[test]
    fn rivers_are_connected_on_a_generated_map() {
        let mut tile_map = map_from_rows(&[
            "..........................",
            ".########################.",
            ".########################.",
            ".########################.",
            ".########################.",
            ".########################.",
            ".########################.",
            ".########################.",
            "..........................",
        ]);
        for tile in tile_map.all_tiles() {
            let [x, y] = tile.to_offset(tile_map.grid).to_array();
            let height = 1000 - ((x - 13).abs() * 15 + (y - 4).abs() * 20) as u32;
            tile_map.height_list[tile.index()] = height;
            if tile.is_land(&tile_map) && height > 900 {
                tile.set_terrain(&mut tile_map, Terrain::Mountains);
            }
        }
        tile_map.terrain_percentages.river = 100;
        tile_map.generate_temperature_map(TemperatureStage::Final);
        tile_map.generate_wetness_map(100);
        tile_map.add_rivers();

        assert!(tile_map.river_tile_count() > 0);
        assert_rivers_connected(&tile_map);
    }
}
