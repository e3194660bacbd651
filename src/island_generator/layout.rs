//! How the island strategy splits the land mass between islands.

use crate::{
    error::MapGenError,
    grid::SquareGrid,
    island_generator::GenerationState,
    map_parameters::{IslandLayout, MapParameters},
    tile_map::TileMap,
};

/// Share of the land, in percent, given to each player's big continent, the medium islands
/// and the small islands by [`IslandLayout::FewBigContinents`].
const CONTINENT_FRACTIONS: (u32, u32, u32) = (70, 20, 10);
/// A big continent smaller than this percentage of its request makes the layout restart.
const BIG_ISLAND_MIN_PERCENT: u32 = 95;
/// Filler islands of [`IslandLayout::SeveralBigIslands`] stop after this many tries.
const FILLER_TRIES: u32 = 1500;
/// Tiny leftover islands of [`IslandLayout::ManyFairIslands`] stop after this many tries.
const LEFTOVER_TRIES: u32 = 100;
/// A filler or leftover loop gives up after this many islands in a row failed to fit.
const MAX_CONSECUTIVE_FAILURES: u32 = 20;

/// One island a layout asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandRequest {
    pub mass: u32,
    /// Number of players the island is sized for.
    pub player_slots: u32,
}

/// Picks the layout [`IslandLayout::Auto`] stands for.
///
/// An even number of players on a map with little land gets islands sized per player, few
/// players or a lot of land get a continent each, and the rest share a handful of big islands.
pub fn resolve_layout(layout: IslandLayout, player_num: u32, land_percent: u32) -> IslandLayout {
    match layout {
        IslandLayout::Auto if player_num >= 2 && player_num % 2 == 0 && land_percent <= 60 => {
            IslandLayout::ManyFairIslands
        }
        IslandLayout::Auto if player_num <= 4 || land_percent > 80 => IslandLayout::FewBigContinents,
        IslandLayout::Auto => IslandLayout::SeveralBigIslands,
        layout => layout,
    }
}

/// Land mass available to islands once `spares` rows and columns are kept free.
///
/// The polar rows are never used, so six rows are always kept back.
pub fn total_mass(grid: SquareGrid, land_percent: u32, spares: u32) -> u32 {
    let rows = (grid.height() as u64).saturating_sub(6 + spares as u64);
    let columns = (grid.width() as u64).saturating_sub(spares as u64);
    (rows * land_percent as u64 * columns / 100) as u32
}

/// The islands of [`IslandLayout::ManyFairIslands`], biggest first.
///
/// With an odd player count one island holds three players; every other player shares an
/// island with one more. Each player then adds a medium and a small island. The weight of
/// the shared islands drops as the land percentage grows.
pub fn island_plan(player_num: u32, land_percent: u32, total_mass: u32) -> Vec<IslandRequest> {
    let big_weight: u64 = match land_percent {
        0..=40 => 70,
        41..=60 => 50,
        _ => 30,
    };
    let total_weight = (30 + big_weight) * player_num as u64;
    if total_weight == 0 {
        return Vec::new();
    }
    let mass_of = |weight: u64| (weight * total_mass as u64 / total_weight) as u32;

    let mut plan = Vec::new();
    let pairs = if player_num % 2 == 1 {
        plan.push(IslandRequest {
            mass: mass_of(big_weight * 3),
            player_slots: 3,
        });
        player_num.saturating_sub(3) / 2
    } else {
        player_num / 2
    };
    for _ in 0..pairs {
        plan.push(IslandRequest {
            mass: mass_of(big_weight * 2),
            player_slots: 2,
        });
    }
    for weight in [20, 10] {
        for _ in 0..player_num {
            plan.push(IslandRequest {
                mass: mass_of(weight),
                player_slots: 0,
            });
        }
    }
    plan
}

impl TileMap {
    /// Places the islands of the configured layout and returns the final generation state.
    ///
    /// The provisional temperature map must exist, because islands are typed as they are
    /// placed. A land percentage of `0` leaves the map all ocean.
    pub fn generate_islands(
        &mut self,
        map_parameters: &MapParameters,
        player_num: u32,
    ) -> Result<GenerationState, MapGenError> {
        let requested = map_parameters.terrain_settings.land_percent;
        let layout = resolve_layout(map_parameters.island_layout, player_num, requested);
        let land_percent = requested.min(layout.max_land_percent());
        if land_percent < requested {
            tracing::warn!(?layout, requested, land_percent, "lowering land percentage for the layout");
        }
        tracing::debug!(?layout, players = player_num, land_percent, "placing islands");

        let state = match layout {
            IslandLayout::FewBigContinents | IslandLayout::Auto => {
                self.make_few_big_continents(land_percent, player_num)?
            }
            IslandLayout::SeveralBigIslands => self.make_several_big_islands(land_percent, player_num)?,
            IslandLayout::ManyFairIslands => self.make_many_fair_islands(land_percent, player_num)?,
        };

        tracing::debug!(
            islands = state.isle_index - 1,
            unplaced = state.unplaced_mass,
            "islands placed"
        );
        Ok(state)
    }

    /// One big continent per player, then as many medium and small islands.
    ///
    /// When a continent cannot be placed at [`BIG_ISLAND_MIN_PERCENT`] of its size the map
    /// is cleared and the layout restarts with one percent of the land moved from the big
    /// continents to the small islands.
    fn make_few_big_continents(
        &mut self,
        land_percent: u32,
        player_num: u32,
    ) -> Result<GenerationState, MapGenError> {
        let total = total_mass(self.grid, land_percent, 1);
        let total_weight = 100 * player_num.max(1) as u64;
        let mass_of = |weight: u32| (weight as u64 * total as u64 / total_weight) as u32;

        let (mut big, medium, mut small) = CONTINENT_FRACTIONS;
        let mut state = GenerationState::new(self, total);
        if total == 0 {
            return Ok(state);
        }

        loop {
            if big <= medium {
                return Err(MapGenError::IslandGeneration(format!(
                    "could not place {player_num} continents on a {}x{} map",
                    self.grid.width(),
                    self.grid.height()
                )));
            }
            let placed_all = (0..player_num).all(|_| {
                self.place_island(&mut state, mass_of(big), 1, BIG_ISLAND_MIN_PERCENT)
            });
            if placed_all {
                break;
            }

            tracing::debug!(big, small, "continents did not fit, restarting");
            big -= 1;
            small += 1;
            self.reset_layers();
            state = GenerationState::new(self, total);
        }

        for _ in 0..player_num {
            self.place_island(&mut state, mass_of(medium), 0, 0);
        }
        for _ in 0..player_num {
            self.place_island(&mut state, mass_of(small), 0, 0);
        }
        Ok(state)
    }

    /// `ceil(sqrt(players))` big islands sharing the land, then filler islands of a quarter
    /// of their size at most.
    fn make_several_big_islands(
        &mut self,
        land_percent: u32,
        player_num: u32,
    ) -> Result<GenerationState, MapGenError> {
        let total = total_mass(self.grid, land_percent, 1);
        let mut state = GenerationState::new(self, total);
        if total == 0 {
            return Ok(state);
        }

        let big_count = (player_num as f64).sqrt().ceil().max(1.0) as u32;
        let big_mass = total / big_count;
        let slots = player_num.div_ceil(big_count);
        for _ in 0..big_count {
            self.place_island(&mut state, big_mass, slots, 0);
        }

        let filler_max = (big_mass / 4).max(2);
        let mut failures = 0;
        for _ in 0..FILLER_TRIES {
            if state.unplaced_mass <= 0 || failures >= MAX_CONSECUTIVE_FAILURES {
                break;
            }
            let mass = self.random_number_generator.rand_below(filler_max / 2 + 1) + filler_max / 2;
            let mass = mass.min(state.unplaced_mass as u32).max(1);
            if self.place_island(&mut state, mass, 0, 0) {
                failures = 0;
            } else {
                failures += 1;
            }
        }
        Ok(state)
    }

    /// The islands of [`island_plan`], then tiny islands from whatever land is left.
    fn make_many_fair_islands(
        &mut self,
        land_percent: u32,
        player_num: u32,
    ) -> Result<GenerationState, MapGenError> {
        if player_num < 2 {
            return Err(MapGenError::IslandGeneration(
                "fair islands need at least two players".to_string(),
            ));
        }
        let spares = land_percent.saturating_sub(5) / 30;
        let total = total_mass(self.grid, land_percent, spares);
        let mut state = GenerationState::new(self, total);
        if total == 0 {
            return Ok(state);
        }

        for request in island_plan(player_num, land_percent, total) {
            self.place_island(&mut state, request.mass, request.player_slots, 0);
        }

        let mut failures = 0;
        for _ in 0..LEFTOVER_TRIES {
            if state.unplaced_mass < 2 || failures >= MAX_CONSECUTIVE_FAILURES {
                break;
            }
            let mass = (1 + self.random_number_generator.rand_below(3)).min(state.unplaced_mass as u32);
            if self.place_island(&mut state, mass, 0, 0) {
                failures = 0;
            } else {
                failures += 1;
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::{IslandRequest, island_plan, resolve_layout, total_mass};
    use crate::{
        error::MapGenError,
        grid::{Size, SquareGrid},
        map_parameters::{IslandLayout, MapParameters},
        tile_map::{TemperatureStage, TileMap},
    };

    fn island_map(layout: IslandLayout, land_percent: u32, seed: &str) -> (MapParameters, TileMap) {
        let mut map_parameters = MapParameters::with_size(60, 40);
        map_parameters.island_layout = layout;
        map_parameters.terrain_settings.land_percent = land_percent;
        let mut tile_map = TileMap::new(&map_parameters, seed);
        tile_map.generate_temperature_map(TemperatureStage::Provisional);
        (map_parameters, tile_map)
    }

    #[test]
    fn auto_layout_follows_players_and_land() {
        assert_eq!(resolve_layout(IslandLayout::Auto, 4, 30), IslandLayout::ManyFairIslands);
        assert_eq!(resolve_layout(IslandLayout::Auto, 4, 70), IslandLayout::FewBigContinents);
        assert_eq!(resolve_layout(IslandLayout::Auto, 3, 30), IslandLayout::FewBigContinents);
        assert_eq!(resolve_layout(IslandLayout::Auto, 7, 30), IslandLayout::SeveralBigIslands);
        assert_eq!(resolve_layout(IslandLayout::Auto, 6, 82), IslandLayout::FewBigContinents);
        assert_eq!(resolve_layout(IslandLayout::Auto, 5, 81), IslandLayout::FewBigContinents);
        assert_eq!(resolve_layout(IslandLayout::Auto, 5, 80), IslandLayout::SeveralBigIslands);
        assert_eq!(
            resolve_layout(IslandLayout::SeveralBigIslands, 2, 30),
            IslandLayout::SeveralBigIslands
        );
    }

    #[test]
    fn fair_island_plan_conserves_mass() {
        let total = total_mass(SquareGrid::new(Size::new(80, 50)), 30, 0);
        for players in 2..=9 {
            let plan = island_plan(players, 30, total);
            let planned: u32 = plan.iter().map(|request| request.mass).sum();
            assert!(planned <= total);
            assert!(planned + plan.len() as u32 >= total);

            let slots: u32 = plan.iter().map(|request| request.player_slots).sum();
            assert_eq!(slots, players);
        }
        assert_eq!(
            island_plan(3, 30, 1000)[0],
            IslandRequest {
                mass: 700,
                player_slots: 3
            }
        );
    }

    #[test]
    fn fair_islands_never_share_a_tile() {
        let (map_parameters, mut tile_map) = island_map(IslandLayout::ManyFairIslands, 30, "gen4");
        let state = tile_map.generate_islands(&map_parameters, 4).unwrap();

        assert!(state.claimed.len() as u32 <= state.total_mass);
        assert_eq!(state.unplaced_mass, (state.total_mass as usize - state.claimed.len()) as i64);
        assert_eq!(tile_map.land_tile_count(), state.claimed.len());
        assert!(state.isle_index > 4);
    }

    #[test]
    fn continents_take_most_of_the_land() {
        let (map_parameters, mut tile_map) = island_map(IslandLayout::FewBigContinents, 30, "gen2");
        let state = tile_map.generate_islands(&map_parameters, 2).unwrap();

        let largest = (1..state.isle_index)
            .map(|island| tile_map.continent_id_list.iter().filter(|&&id| id == island).count())
            .max()
            .unwrap();
        assert!(largest as u32 >= state.total_mass / 4);
    }

    #[test]
    fn several_big_islands_fill_the_land() {
        let (map_parameters, mut tile_map) = island_map(IslandLayout::SeveralBigIslands, 30, "gen3");
        let state = tile_map.generate_islands(&map_parameters, 5).unwrap();
        assert!(state.claimed.len() as u32 >= state.total_mass / 2);
    }

    #[test]
    fn too_much_land_is_lowered_to_what_the_layout_holds() {
        for (layout, players) in [
            (IslandLayout::FewBigContinents, 2),
            (IslandLayout::SeveralBigIslands, 5),
            (IslandLayout::Auto, 5),
        ] {
            let (map_parameters, mut tile_map) = island_map(layout, 90, "full");
            let state = tile_map.generate_islands(&map_parameters, players).unwrap();

            let max_land = resolve_layout(layout, players, 90).max_land_percent();
            assert_eq!(state.total_mass, total_mass(tile_map.grid, max_land, 1));
            assert!(tile_map.land_tile_count() > 0);
        }
    }

    #[test]
    fn fair_islands_need_two_players() {
        let (map_parameters, mut tile_map) = island_map(IslandLayout::ManyFairIslands, 30, "solo");
        assert!(matches!(
            tile_map.generate_islands(&map_parameters, 1),
            Err(MapGenError::IslandGeneration(_))
        ));
    }

    #[test]
    fn no_land_means_no_islands() {
        let (map_parameters, mut tile_map) = island_map(IslandLayout::SeveralBigIslands, 0, "dry");
        let state = tile_map.generate_islands(&map_parameters, 3).unwrap();
        assert_eq!(state.isle_index, 1);
        assert_eq!(tile_map.land_tile_count(), 0);
    }
}
