//! This module defines the `Generator` trait for map generation, the strategies implementing
//! it, and the [`MapGenerator`] that picks a strategy for each request.

use std::panic::{self, AssertUnwindSafe};

use crate::{
    error::{FairFailure, MapGenError},
    island_generator::fair::FairIslandGenerator,
    map_parameters::{GeneratorMode, MapParameters},
    map_result::MapResult,
    player::Player,
    random::generate_seed,
    tile_map::{TemperatureStage, TileMap},
};

pub mod fractal;
pub mod fracture;
pub mod island;
pub mod random;

use fractal::Fractal;
use fracture::Fracture;
use island::Island;
use random::Random;

/// A trait that allows for the generation of a tile map.
///
/// If you want to create a new map generator, you need to implement this trait.
pub trait Generator {
    fn new(map_parameters: &MapParameters, seed: &str) -> Self;

    fn into_inner(self) -> TileMap;

    fn tile_map_mut(&mut self) -> &mut TileMap;

    /// Fills the height map, or places land directly.
    fn generate_height_map(
        &mut self,
        map_parameters: &MapParameters,
        player_num: u32,
    ) -> Result<(), MapGenError>;

    fn generate_provisional_temperature(&mut self) {
        self.tile_map_mut()
            .generate_temperature_map(TemperatureStage::Provisional);
    }

    fn generate_terrain(&mut self, map_parameters: &MapParameters) {
        self.tile_map_mut().generate_terrain(map_parameters);
    }

    fn add_rivers(&mut self) {
        self.tile_map_mut().add_rivers();
    }

    fn place_resources(&mut self, map_parameters: &MapParameters) {
        self.tile_map_mut()
            .place_resources(map_parameters.terrain_settings.resource_percent);
    }

    fn choose_starting_positions(&mut self, player_num: u32) {
        self.tile_map_mut().choose_starting_positions(player_num);
    }

    fn generate(
        map_parameters: &MapParameters,
        seed: &str,
        player_num: u32,
    ) -> Result<TileMap, MapGenError>
    where
        Self: Sized,
    {
        let mut map = Self::new(map_parameters, seed);
        // The order of the following methods is important. Do not change it.
        map.generate_height_map(map_parameters, player_num)?;

        map.generate_provisional_temperature();

        map.generate_terrain(map_parameters);

        map.add_rivers();

        map.place_resources(map_parameters);

        map.choose_starting_positions(player_num);

        Ok(map.into_inner())
    }
}

/// Generates common methods for a struct.
///
/// This macro generates the following methods:
/// - `new`: Creates a new instance of the struct with the given `MapParameters` and seed.
/// - `into_inner`: Consumes the struct and returns the inner `TileMap`.
/// - `tile_map_mut`: Provides a mutable reference to the inner `TileMap`.
#[macro_export]
macro_rules! generate_common_methods {
    () => {
        /// Creates a new instance of the struct with the given `MapParameters` and seed.
        fn new(map_parameters: &MapParameters, seed: &str) -> Self {
            Self(TileMap::new(map_parameters, seed))
        }

        /// Consumes the struct and returns the inner `TileMap`.
        fn into_inner(self) -> TileMap {
            self.0
        }

        /// Provides a mutable reference to the inner `TileMap`.
        fn tile_map_mut(&mut self) -> &mut TileMap {
            &mut self.0
        }
    };
}

/// Entry point of map generation. Holds the validated parameters and no per-run state, so
/// one generator can serve any number of requests.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    map_parameters: MapParameters,
}

impl MapGenerator {
    /// Validates `map_parameters` and creates a generator for them.
    pub fn new(map_parameters: MapParameters) -> Result<Self, MapGenError> {
        map_parameters.validate()?;
        Ok(Self { map_parameters })
    }

    pub fn map_parameters(&self) -> &MapParameters {
        &self.map_parameters
    }

    /// Generates a map for `players` with `mode`, or the configured mode when `mode` is `None`.
    ///
    /// The same parameters, seed, roster size and mode always produce the same map. A fair
    /// map that cannot be made is replaced by an island map with the same seed; the
    /// returned [`MapResult::mode`] tells which one was produced.
    pub fn generate(
        &self,
        players: &[Player],
        mode: Option<GeneratorMode>,
    ) -> Result<MapResult, MapGenError> {
        if players.is_empty() {
            return Err(MapGenError::NoPlayers);
        }
        let mode = mode.unwrap_or(self.map_parameters.generator_mode);
        if mode == GeneratorMode::Scenario {
            return Err(MapGenError::UnsupportedMode(mode));
        }

        let seed = self.map_parameters.seed.clone().unwrap_or_else(generate_seed);
        let player_num = players.len() as u32;
        let map_parameters = &self.map_parameters;
        tracing::info!(
            ?mode,
            seed = seed.as_str(),
            players = player_num,
            width = map_parameters.map_size.width,
            height = map_parameters.map_size.height,
            "generating map"
        );

        let (tile_map, mode) = match mode {
            GeneratorMode::Fractal => (Fractal::generate(map_parameters, &seed, player_num)?, mode),
            GeneratorMode::Island => (Island::generate(map_parameters, &seed, player_num)?, mode),
            GeneratorMode::Random => (Random::generate(map_parameters, &seed, player_num)?, mode),
            GeneratorMode::Fracture => (Fracture::generate(map_parameters, &seed, player_num)?, mode),
            GeneratorMode::Fair => self.generate_fair(&seed, player_num)?,
            GeneratorMode::Scenario => return Err(MapGenError::UnsupportedMode(mode)),
        };

        let starts = tile_map.starting_tile_list.len();
        if starts < players.len() {
            tracing::warn!(
                starts,
                players = players.len(),
                "the map cannot host every player"
            );
        }

        let result = MapResult::from_tile_map(&tile_map, players, seed, mode);
        tracing::info!(
            ?mode,
            land_tiles = tile_map.land_tile_count(),
            continents = tile_map.continent_count(),
            rivers = tile_map.river_tile_count(),
            "map generated"
        );
        Ok(result)
    }

    /// Runs a fair attempt and falls back to an island map once if it fails or panics.
    fn generate_fair(
        &self,
        seed: &str,
        player_num: u32,
    ) -> Result<(TileMap, GeneratorMode), MapGenError> {
        let fair = FairIslandGenerator::new(&self.map_parameters, seed, player_num);
        match panic::catch_unwind(AssertUnwindSafe(|| fair.run())) {
            Ok(Ok(tile_map)) => return Ok((tile_map, GeneratorMode::Fair)),
            Ok(Err(failure)) => {
                tracing::warn!(%failure, "fair islands failed, falling back to islands");
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|message| message.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                let failure = FairFailure::Internal(message);
                tracing::error!(%failure, "fair islands aborted, falling back to islands");
            }
        }

        let tile_map = Island::generate(&self.map_parameters, seed, player_num)?;
        Ok((tile_map, GeneratorMode::Island))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, time::Duration};

    use super::MapGenerator;
    use crate::{
        error::MapGenError,
        map_parameters::{GeneratorMode, IslandLayout, MapParameters},
        map_result::MapResult,
        player::Player,
        tile_map::MIN_START_DISTANCE,
    };

    const TERRAIN_MODES: [GeneratorMode; 4] = [
        GeneratorMode::Fractal,
        GeneratorMode::Island,
        GeneratorMode::Random,
        GeneratorMode::Fracture,
    ];

    fn players(count: u32) -> Vec<Player> {
        (0..count)
            .map(|id| Player::new(id, format!("Player {id}")))
            .collect()
    }

    fn seeded(width: u32, height: u32, seed: &str) -> MapParameters {
        let mut map_parameters = MapParameters::with_size(width, height);
        map_parameters.seed = Some(seed.to_string());
        map_parameters
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn generate(map_parameters: MapParameters, player_count: u32, mode: GeneratorMode) -> MapResult {
        init_tracing();
        MapGenerator::new(map_parameters)
            .unwrap()
            .generate(&players(player_count), Some(mode))
            .unwrap()
    }

    /// Land tiles reached from each other through edges, as sets of positions.
    fn land_components(result: &MapResult) -> Vec<HashSet<(u32, u32)>> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for tile in result.tiles.iter().filter(|tile| tile.terrain.is_land()) {
            if !seen.insert((tile.x, tile.y)) {
                continue;
            }
            let mut component = HashSet::from([(tile.x, tile.y)]);
            let mut frontier = vec![(tile.x, tile.y)];
            while let Some((x, y)) = frontier.pop() {
                let neighbors = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbors {
                    if result.tile(nx, ny).is_some_and(|other| other.terrain.is_land())
                        && seen.insert((nx, ny))
                    {
                        component.insert((nx, ny));
                        frontier.push((nx, ny));
                    }
                }
            }
            components.push(component);
        }
        components
    }

    #[test]
    fn same_seed_same_map() {
        for mode in TERRAIN_MODES {
            let first = generate(seeded(40, 30, "determinism"), 2, mode);
            let second = generate(seeded(40, 30, "determinism"), 2, mode);
            assert_eq!(first.tiles, second.tiles, "{mode:?}");
            assert_eq!(first.starting_positions, second.starting_positions, "{mode:?}");
        }
    }

    fn assert_tiles_complete(result: &MapResult) {
        let mode = result.mode;
        assert_eq!(result.tiles.len(), (result.width * result.height) as usize);
        for tile in &result.tiles {
            assert!(tile.river_mask <= 15);
            assert_eq!(tile.continent_id == 0, tile.terrain.is_water(), "{mode:?}");
            if tile.terrain.is_water() {
                assert_eq!(tile.river_mask, 0);
            }
        }
    }

    fn assert_rivers_connected(result: &MapResult) {
        let mode = result.mode;
        for tile in result.tiles.iter().filter(|tile| tile.river_mask != 0) {
            for (bit, dx, dy, back) in [(1, 0, -1, 4), (2, 1, 0, 8), (4, 0, 1, 1), (8, -1, 0, 2)] {
                if tile.river_mask & bit == 0 {
                    continue;
                }
                let neighbor = result
                    .tile((tile.x as i32 + dx) as u32, (tile.y as i32 + dy) as u32)
                    .unwrap();
                assert!(
                    neighbor.terrain.is_water() || neighbor.river_mask & back != 0,
                    "{mode:?}: river at ({}, {}) is cut",
                    tile.x,
                    tile.y
                );
            }
        }
    }

    fn assert_continents_match_components(result: &MapResult, min_island_size: usize) {
        let mode = result.mode;
        let components = land_components(result);
        let mut ids = HashSet::new();
        for component in &components {
            assert!(component.len() >= min_island_size, "{mode:?}");
            let component_ids: HashSet<u32> = component
                .iter()
                .filter_map(|&(x, y)| result.tile(x, y))
                .map(|tile| tile.continent_id)
                .collect();
            assert_eq!(component_ids.len(), 1, "{mode:?}");
            assert!(ids.insert(*component_ids.iter().next().unwrap()));
        }
        assert_eq!(ids, (1..=components.len() as u32).collect::<HashSet<u32>>());
    }

    fn assert_starts_spread(result: &MapResult, player_count: u32) {
        let mode = result.mode;
        assert_eq!(result.starting_positions.len(), player_count as usize, "{mode:?}");
        for (index, a) in result.starting_positions.iter().enumerate() {
            let tile = result.tile(a.x, a.y).unwrap();
            assert!(tile.terrain.is_land(), "{mode:?}");
            for b in &result.starting_positions[index + 1..] {
                let distance = a.x.abs_diff(b.x).max(a.y.abs_diff(b.y));
                assert!(distance >= MIN_START_DISTANCE, "{mode:?}");
            }
        }
        let ids: Vec<u32> = result.starting_positions.iter().map(|start| start.player_id).collect();
        assert_eq!(ids, (0..player_count).collect::<Vec<u32>>());
    }

    #[test]
    fn every_tile_is_complete() {
        for mode in TERRAIN_MODES {
            let result = generate(seeded(40, 30, "complete"), 2, mode);
            assert_eq!(result.tiles.len(), 40 * 30);
            assert_tiles_complete(&result);
        }
    }

    #[test]
    fn rivers_are_connected_in_every_mode() {
        for mode in TERRAIN_MODES {
            assert_rivers_connected(&generate(seeded(50, 40, "rivers"), 2, mode));
        }
    }

    #[test]
    fn continents_match_land_components() {
        let map_parameters = seeded(50, 40, "continents");
        let min_island_size = map_parameters.min_island_size as usize;
        for mode in TERRAIN_MODES {
            let result = generate(map_parameters.clone(), 2, mode);
            assert_continents_match_components(&result, min_island_size);
        }
    }

    #[test]
    fn starting_positions_are_spread() {
        for mode in TERRAIN_MODES {
            assert_starts_spread(&generate(seeded(60, 40, "starts"), 4, mode), 4);
        }
    }

    #[test]
    fn fair_islands_keep_the_map_invariants() {
        let map_parameters = seeded(60, 40, "fair");
        let min_island_size = map_parameters.min_island_size as usize;
        let result = generate(map_parameters, 2, GeneratorMode::Fair);

        assert_eq!(result.mode, GeneratorMode::Fair);
        assert_tiles_complete(&result);
        assert_rivers_connected(&result);
        assert_continents_match_components(&result, min_island_size);
        assert_starts_spread(&result, 2);
    }

    #[test]
    fn crowded_fair_map_falls_back_to_continents() {
        let mut map_parameters = seeded(60, 40, "auto");
        map_parameters.terrain_settings.land_percent = 82;
        let result = generate(map_parameters, 6, GeneratorMode::Fair);
        assert_eq!(result.mode, GeneratorMode::Island);
        assert!(!result.starting_positions.is_empty());
    }

    #[test]
    fn island_mode_lowers_land_the_layout_cannot_hold() {
        let mut map_parameters = seeded(60, 40, "heavy");
        map_parameters.terrain_settings.land_percent = 81;
        map_parameters.island_layout = IslandLayout::SeveralBigIslands;
        let result = generate(map_parameters, 5, GeneratorMode::Island);
        assert_eq!(result.mode, GeneratorMode::Island);
        assert_tiles_complete(&result);
    }

    #[test]
    fn unfair_map_falls_back_to_islands() {
        let mut map_parameters = seeded(20, 20, "fallback");
        map_parameters.terrain_settings.land_percent = 1;
        let result = generate(map_parameters, 1, GeneratorMode::Fair);
        assert_eq!(result.mode, GeneratorMode::Island);
        assert_eq!(result.tiles.len(), 400);
    }

    #[test]
    fn expired_fair_deadline_falls_back_to_islands() {
        let mut map_parameters = seeded(60, 40, "deadline");
        map_parameters.fair_timeout = Duration::ZERO;
        map_parameters.island_layout = IslandLayout::FewBigContinents;
        let result = generate(map_parameters, 2, GeneratorMode::Fair);
        assert_eq!(result.mode, GeneratorMode::Island);
    }

    #[test]
    fn fair_mode_is_deterministic() {
        let first = generate(seeded(60, 40, "fair"), 2, GeneratorMode::Fair);
        let second = generate(seeded(60, 40, "fair"), 2, GeneratorMode::Fair);
        assert_eq!(first.mode, second.mode);
        assert_eq!(first.tiles, second.tiles);
    }

    #[test]
    fn scenario_mode_is_rejected() {
        let generator = MapGenerator::new(seeded(40, 30, "scenario")).unwrap();
        assert!(matches!(
            generator.generate(&players(2), Some(GeneratorMode::Scenario)),
            Err(MapGenError::UnsupportedMode(GeneratorMode::Scenario))
        ));
    }

    #[test]
    fn empty_roster_is_rejected() {
        let generator = MapGenerator::new(seeded(40, 30, "nobody")).unwrap();
        assert!(matches!(
            generator.generate(&[], None),
            Err(MapGenError::NoPlayers)
        ));
    }

    #[test]
    fn invalid_size_is_rejected() {
        assert!(matches!(
            MapGenerator::new(MapParameters::with_size(10, 300)),
            Err(MapGenError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn missing_seed_is_generated_and_recorded() {
        let generator = MapGenerator::new(MapParameters::with_size(30, 30)).unwrap();
        let result = generator.generate(&players(1), None).unwrap();
        assert!(!result.seed.is_empty());

        let mut replay = MapParameters::with_size(30, 30);
        replay.seed = Some(result.seed.clone());
        let replayed = MapGenerator::new(replay).unwrap().generate(&players(1), None).unwrap();
        assert_eq!(replayed.tiles, result.tiles);
    }
}
