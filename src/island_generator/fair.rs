//! Fair islands: every player receives identical islands.
//!
//! One main, one medium and one small island are grown and typed once, then stamped for
//! every player in a random mirror image at random spots that do not touch each other.
//! The generator gives up with a [`FairFailure`] instead of producing an unfair map.

use std::{
    collections::{HashMap, VecDeque},
    time::{Duration, Instant},
};

use glam::IVec2;
use rand::seq::SliceRandom;

use crate::{
    error::FairFailure,
    grid::{Direction, OffsetCoordinate},
    height_map::MAX_HEIGHT,
    island_generator::{COAST_TO_PEAK_STEPS, IslandShape},
    map_parameters::MapParameters,
    tile::Tile,
    tile_component::Terrain,
    tile_map::{MIN_START_DISTANCE, TemperatureStage, TileMap},
};

/// The main island of a player must have at least this many tiles.
pub const FAIR_MIN_ISLAND_MASS: u32 = 16;
/// The islands of all players may cover at most `1 / FAIR_FOOTPRINT_FACTOR` of the map
/// inside its two-tile border.
pub const FAIR_FOOTPRINT_FACTOR: u32 = 2;
/// Share of a player's land, in tenths, on its main, medium and small island.
const ISLAND_TENTHS: [u32; 3] = [7, 2, 1];

/// A wall-clock budget, checked cooperatively between steps.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout: Duration,
}

impl Deadline {
    pub fn start(timeout: Duration) -> Self {
        Self {
            start: Instant::now(),
            timeout,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start.elapsed() >= self.timeout
    }

    pub fn check(&self) -> Result<(), FairFailure> {
        if self.is_expired() {
            Err(FairFailure::TimedOut)
        } else {
            Ok(())
        }
    }
}

/// Sizes of the islands every player receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairIslandPlan {
    pub main: u32,
    pub medium: u32,
    pub small: u32,
}

impl FairIslandPlan {
    /// Splits the land of each player into a main, a medium and a small island, and checks
    /// that the islands can exist at all on this map.
    pub fn new(map_parameters: &MapParameters, player_num: u32) -> Result<Self, FairFailure> {
        let size = map_parameters.map_size;
        let area = size.area();
        let land_percent = map_parameters.terrain_settings.land_percent;
        let player_mass = area * land_percent / 100 / player_num.max(1);
        let min_island_size = map_parameters.min_island_size;

        let [main, medium, small] =
            ISLAND_TENTHS.map(|tenths| (player_mass * tenths / 10).max(min_island_size));
        let plan = Self {
            main,
            medium,
            small,
        };

        let footprint = player_num * (main + medium + small);
        let available = size.width.saturating_sub(4) * size.height.saturating_sub(4);
        if player_mass * 7 / 10 < FAIR_MIN_ISLAND_MASS || footprint * FAIR_FOOTPRINT_FACTOR > available {
            return Err(FairFailure::Infeasible {
                island_mass: player_mass * 7 / 10,
                required: FAIR_MIN_ISLAND_MASS,
                footprint,
                available,
            });
        }
        Ok(plan)
    }
}

/// A typed island, ready to be stamped. Positions are relative to its bounding box.
#[derive(Debug, Clone)]
struct IslandTemplate {
    cells: Vec<TemplateCell>,
    size: IVec2,
    /// Best starting tile, on the main island only.
    start: Option<IVec2>,
}

#[derive(Debug, Clone, Copy)]
struct TemplateCell {
    position: IVec2,
    terrain: Terrain,
    height: u32,
}

impl IslandTemplate {
    /// Grows an island of `mass` tiles and types it from the terrain percentages of the map.
    ///
    /// Every terrain gets its share of the island; tiles on the coast only take hills,
    /// mountains, forest, desert or swamp with a reduced chance. The rest is grassland and
    /// plains. With `with_start`, the innermost tile becomes a grassland start.
    fn grow(tile_map: &mut TileMap, mass: u32, with_start: bool) -> Option<Self> {
        let shape = IslandShape::grow(tile_map.grid, mass, &mut tile_map.random_number_generator)?;
        let bounds = shape.bounds();
        let origin = IVec2::new(bounds.west, bounds.north);
        let positions: Vec<IVec2> = shape.cells().map(|cell| cell - origin).collect();
        let inside: HashMap<IVec2, usize> = positions
            .iter()
            .enumerate()
            .map(|(index, &position)| (position, index))
            .collect();

        let distance = Self::coast_distance(&positions, &inside);
        let rng = &mut tile_map.random_number_generator;

        let shore_level = tile_map.shore_level;
        let step = (MAX_HEIGHT - shore_level) / (COAST_TO_PEAK_STEPS + 1);
        let mut cells: Vec<TemplateCell> = positions
            .iter()
            .enumerate()
            .map(|(index, &position)| TemplateCell {
                position,
                terrain: if rng.rand_below(2) == 0 { Terrain::Grassland } else { Terrain::Plains },
                height: (shore_level
                    + step * distance[index].min(COAST_TO_PEAK_STEPS)
                    + rng.rand_below(step / 2 + 1))
                .min(MAX_HEIGHT),
            })
            .collect();

        let percentages = tile_map.terrain_percentages;
        let count = cells.len() as u32;
        let share = |percent: u32| count * percent / 100;
        let passes = [
            (share(percentages.mountain), 20, [Terrain::Mountains, Terrain::Hills]),
            (share(percentages.forest + percentages.jungle), 60, [Terrain::Forest; 2]),
            (share(percentages.desert), 40, [Terrain::Desert; 2]),
            (share(percentages.swamp), 50, [Terrain::Swamp; 2]),
        ];

        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.shuffle(rng);
        let mut typed = vec![false; cells.len()];
        for (mut remaining, coast_percent, terrains) in passes {
            for &index in &order {
                if remaining == 0 {
                    break;
                }
                if typed[index] || (distance[index] == 0 && rng.rand_below(100) >= coast_percent) {
                    continue;
                }
                cells[index].terrain = terrains[rng.rand_below(2) as usize];
                typed[index] = true;
                remaining -= 1;
            }
        }

        let start = if with_start {
            let index = order
                .iter()
                .copied()
                .max_by_key(|&index| distance[index])?;
            cells[index].terrain = Terrain::Grassland;
            Some(cells[index].position)
        } else {
            None
        };

        Some(Self {
            cells,
            size: IVec2::new(bounds.east - bounds.west, bounds.south - bounds.north),
            start,
        })
    }

    /// Distance of each cell from the coast. Cells touching the sea through an edge are at `0`.
    fn coast_distance(positions: &[IVec2], inside: &HashMap<IVec2, usize>) -> Vec<u32> {
        let mut distance = vec![u32::MAX; positions.len()];
        let mut queue = VecDeque::new();
        for (index, position) in positions.iter().enumerate() {
            let coastal = Direction::CARDINAL
                .iter()
                .any(|direction| !inside.contains_key(&(*position + direction.offset())));
            if coastal {
                distance[index] = 0;
                queue.push_back(index);
            }
        }

        while let Some(index) = queue.pop_front() {
            for direction in Direction::CARDINAL {
                if let Some(&next) = inside.get(&(positions[index] + direction.offset())) {
                    if distance[next] == u32::MAX {
                        distance[next] = distance[index] + 1;
                        queue.push_back(next);
                    }
                }
            }
        }
        distance
    }

    /// Position of a cell in one of the four mirror images: bit `0` of `mirror` flips the
    /// island horizontally, bit `1` vertically.
    fn mirrored(&self, position: IVec2, mirror: u32) -> IVec2 {
        let x = if mirror & 1 == 0 { position.x } else { self.size.x - 1 - position.x };
        let y = if mirror & 2 == 0 { position.y } else { self.size.y - 1 - position.y };
        IVec2::new(x, y)
    }
}

/// Generates a fair-islands map for a fixed number of players.
#[derive(Debug, Clone, Copy)]
pub struct FairIslandGenerator<'a> {
    map_parameters: &'a MapParameters,
    seed: &'a str,
    player_num: u32,
}

impl<'a> FairIslandGenerator<'a> {
    pub fn new(map_parameters: &'a MapParameters, seed: &'a str, player_num: u32) -> Self {
        Self {
            map_parameters,
            seed,
            player_num,
        }
    }

    /// Runs the whole fair generation, up to the starting positions.
    ///
    /// Each iteration grows new templates and stamps them on a cleared map. Once every
    /// island is placed the map gets its water depth, lakes, climate, continents, rivers and
    /// resources, and the start tiles of the main islands become the starting positions.
    pub fn run(&self) -> Result<TileMap, FairFailure> {
        let deadline = Deadline::start(self.map_parameters.fair_timeout);
        let plan = FairIslandPlan::new(self.map_parameters, self.player_num)?;
        let mut tile_map = TileMap::new(self.map_parameters, self.seed);

        let iterations = (100_000 / tile_map.grid.area() as u32).clamp(1, 10);
        tracing::debug!(?plan, iterations, players = self.player_num, "fair islands");

        for iteration in 1..=iterations {
            deadline.check()?;
            tile_map.reset_layers();

            let templates = [
                IslandTemplate::grow(&mut tile_map, plan.main, true),
                IslandTemplate::grow(&mut tile_map, plan.medium, false),
                IslandTemplate::grow(&mut tile_map, plan.small, false),
            ];
            let [Some(main), Some(medium), Some(small)] = templates else {
                tracing::debug!(iteration, "fair island template did not grow");
                continue;
            };

            match self.stamp_islands(&mut tile_map, &[main, medium, small], &deadline)? {
                Some(starts) => {
                    self.finish(&mut tile_map, starts)?;
                    return Ok(tile_map);
                }
                None => tracing::debug!(iteration, "fair islands did not fit"),
            }
        }

        Err(FairFailure::Placement { iterations })
    }

    /// Stamps every template once per player. Returns the start tiles, or `None` when an
    /// island found no free spot or two starts ended up too close.
    fn stamp_islands(
        &self,
        tile_map: &mut TileMap,
        templates: &[IslandTemplate; 3],
        deadline: &Deadline,
    ) -> Result<Option<Vec<Tile>>, FairFailure> {
        let mut claimed = vec![false; tile_map.grid.area()];
        let mut starts = Vec::with_capacity(self.player_num as usize);

        for _ in 0..self.player_num {
            for template in templates {
                deadline.check()?;
                if !Self::stamp(tile_map, template, &mut claimed, &mut starts) {
                    return Ok(None);
                }
            }
        }

        let grid = tile_map.grid;
        let separated = starts.iter().enumerate().all(|(index, a)| {
            starts[index + 1..]
                .iter()
                .all(|b| a.distance_to(*b, grid) >= MIN_START_DISTANCE)
        });
        Ok(separated.then_some(starts))
    }

    /// Writes one mirror image of `template` at a random spot where it keeps a tile of
    /// water from the map edge and from every island stamped before.
    fn stamp(
        tile_map: &mut TileMap,
        template: &IslandTemplate,
        claimed: &mut [bool],
        starts: &mut Vec<Tile>,
    ) -> bool {
        let grid = tile_map.grid;
        let free_columns = grid.width() as i32 - 1 - template.size.x;
        let free_rows = grid.height() as i32 - 1 - template.size.y;
        if free_columns < 1 || free_rows < 1 {
            return false;
        }

        let rng = &mut tile_map.random_number_generator;
        let mirror = rng.rand_below(4);
        let tries = (grid.area() / 4).max(1);
        for _ in 0..tries {
            let corner = IVec2::new(
                1 + rng.rand_below(free_columns as u32) as i32,
                1 + rng.rand_below(free_rows as u32) as i32,
            );
            let to_tile = |position: IVec2| {
                Tile::from_offset(OffsetCoordinate(corner + template.mirrored(position, mirror)), grid)
            };

            let fits = template.cells.iter().all(|cell| {
                to_tile(cell.position).is_some_and(|tile| {
                    !claimed[tile.index()]
                        && tile
                            .neighbor_tiles(grid)
                            .iter()
                            .all(|neighbor| !claimed[neighbor.index()])
                })
            });
            if !fits {
                continue;
            }

            for cell in &template.cells {
                let Some(tile) = to_tile(cell.position) else {
                    continue;
                };
                claimed[tile.index()] = true;
                tile.set_terrain(tile_map, cell.terrain);
                tile.set_placed(tile_map, true);
                tile_map.height_list[tile.index()] = cell.height;
            }
            if let Some(start) = template.start.and_then(to_tile) {
                starts.push(start);
            }
            return true;
        }
        false
    }

    /// Completes the stamped map and checks that every player has a start.
    fn finish(&self, tile_map: &mut TileMap, starts: Vec<Tile>) -> Result<(), FairFailure> {
        let map_parameters = self.map_parameters;
        tile_map.smooth_water_depth();
        tile_map.regenerate_lakes(map_parameters.lake_max_area_size);
        tile_map.generate_temperature_map(TemperatureStage::Final);
        tile_map.generate_wetness_map(map_parameters.terrain_settings.wetness);
        tile_map.assign_continent_numbers();
        tile_map.add_rivers();
        tile_map.place_resources(map_parameters.terrain_settings.resource_percent);

        let required = self.player_num as usize;
        let found = starts
            .iter()
            .filter(|tile| tile.is_land(tile_map))
            .count();
        if found < required {
            return Err(FairFailure::TooFewStarts { found, required });
        }
        tile_map.starting_tile_list = starts;
        Ok(())
    }
}
