use std::cmp::Reverse;

use crate::{tile::Tile, tile_component::Terrain, tile_map::TileMap};

/// Starting tiles are never closer to each other than this (Chebyshev distance).
pub const MIN_START_DISTANCE: u32 = 4;
/// Starts are taken from continents with at least this many tiles when there are any.
pub const MIN_START_CONTINENT_SIZE: u32 = 10;
/// The first start is drawn among this many best-scored candidates.
const FIRST_START_POOL: usize = 5;
/// Radius of the area a start is scored on.
const SCORE_RADIUS: u32 = 2;
/// A start area with less food than this is scored at half value.
const LOW_FOOD: u32 = 12;

impl TileMap {
    /// Chooses one starting tile per player and stores them in [`TileMap::starting_tile_list`].
    ///
    /// Every land tile that is neither glacier nor mountains, on a continent of at least
    /// [`MIN_START_CONTINENT_SIZE`] tiles, is a candidate. If there is no such continent
    /// every such land tile is. Candidates are scored on the yields, resources and rivers
    /// around them. The first start is drawn among the best candidates; each further start
    /// is the candidate farthest from the chosen ones, up to twice the required distance,
    /// ties going to the better score.
    ///
    /// The required distance starts at `max(MIN_START_DISTANCE, sqrt(land / players) / 2)`
    /// and is relaxed one step at a time down to [`MIN_START_DISTANCE`]. Fewer starts than
    /// players are returned only when even that distance cannot be kept.
    pub fn choose_starting_positions(&mut self, player_num: u32) -> &[Tile] {
        self.starting_tile_list.clear();
        if player_num == 0 {
            return &self.starting_tile_list;
        }

        let can_start = |tile_map: &Self, tile: Tile| {
            tile.is_land(tile_map)
                && !matches!(tile.terrain(tile_map), Terrain::Glacier | Terrain::Mountains)
        };
        let mut candidates: Vec<Tile> = self
            .all_tiles()
            .filter(|&tile| {
                can_start(self, tile)
                    && self.continent_size_list[tile.continent_id(self) as usize]
                        >= MIN_START_CONTINENT_SIZE
            })
            .collect();
        if candidates.is_empty() {
            candidates = self.all_tiles().filter(|&tile| can_start(self, tile)).collect();
        }
        if candidates.is_empty() {
            tracing::warn!("no land can host a starting position");
            return &self.starting_tile_list;
        }

        let mut scored: Vec<(Tile, i64)> = candidates
            .into_iter()
            .map(|tile| (tile, self.start_score(tile)))
            .collect();
        scored.sort_by_key(|&(tile, score)| (Reverse(score), tile));

        let pool = scored.len().min(FIRST_START_POOL) as u32;
        let first = scored[self.random_number_generator.rand_below(pool) as usize].0;

        let land = self.land_tile_count() as f64;
        let ideal = ((land / player_num as f64).sqrt() / 2.0) as u32;
        let mut best_starts = Vec::new();
        for required in (MIN_START_DISTANCE..=ideal.max(MIN_START_DISTANCE)).rev() {
            let starts = self.spread_starts(first, &scored, player_num as usize, required);
            if starts.len() > best_starts.len() {
                best_starts = starts;
            }
            if best_starts.len() == player_num as usize {
                break;
            }
        }

        tracing::debug!(
            players = player_num,
            starts = best_starts.len(),
            "starting positions chosen"
        );
        self.starting_tile_list = best_starts;
        &self.starting_tile_list
    }

    /// Adds starts after `first` as long as a candidate at least `required` away from every
    /// chosen start exists.
    fn spread_starts(
        &self,
        first: Tile,
        scored: &[(Tile, i64)],
        player_num: usize,
        required: u32,
    ) -> Vec<Tile> {
        let grid = self.grid;
        let mut starts = vec![first];

        while starts.len() < player_num {
            let next = scored
                .iter()
                .filter_map(|&(tile, score)| {
                    let nearest = starts
                        .iter()
                        .map(|start| start.distance_to(tile, grid))
                        .min()
                        .unwrap_or(u32::MAX);
                    (nearest >= required).then_some((nearest.min(2 * required), score, Reverse(tile)))
                })
                .max();
            match next {
                Some((_, _, Reverse(tile))) => starts.push(tile),
                None => break,
            }
        }

        starts
    }

    /// Fertility of the area around `tile`.
    ///
    /// Each tile within [`SCORE_RADIUS`] adds `3 * food + 2 * production + trade`, plus `4`
    /// for a resource and `2` for a river. Every ocean neighbour of the start costs `2`, and
    /// an area short of food counts for half.
    fn start_score(&self, tile: Tile) -> i64 {
        let grid = self.grid;
        let mut score = 0i64;
        let mut food = 0;
        for other in tile.tiles_in_distance(SCORE_RADIUS, grid) {
            let (tile_food, production, trade) = other.terrain(self).yields();
            food += tile_food;
            score += (3 * tile_food + 2 * production + trade) as i64;
            if other.resource(self).is_some() {
                score += 4;
            }
            if other.has_river(self) {
                score += 2;
            }
        }

        let ocean_neighbors = tile
            .neighbor_tiles(grid)
            .iter()
            .filter(|neighbor| neighbor.terrain(self).is_ocean())
            .count() as i64;
        score -= 2 * ocean_neighbors;

        if food < LOW_FOOD { score / 2 } else { score }
    }
}
