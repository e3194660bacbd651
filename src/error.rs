//! Error types returned by map generation.

use thiserror::Error;

use crate::map_parameters::GeneratorMode;

/// Errors that abort a generation request.
///
/// Configuration errors are raised before any grid exists. Island layout failures are raised
/// by the island strategy when the requested land cannot be placed at all.
#[derive(Debug, Error)]
pub enum MapGenError {
    #[error("map size {width}x{height} is outside the supported range {min}..={max}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },
    #[error("setting `{name}` is {value}, expected {min}..={max}")]
    InvalidSetting {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("generator mode {0:?} is not supported")]
    UnsupportedMode(GeneratorMode),
    #[error("the player roster is empty")]
    NoPlayers,
    #[error("island generation failed: {0}")]
    IslandGeneration(String),
}

/// Reasons a fair-islands attempt gives up.
///
/// None of these reach the caller: the orchestrator logs them and falls back to the island
/// strategy.
#[derive(Debug, Error)]
pub enum FairFailure {
    #[error(
        "main island mass {island_mass} is below {required} or the islands need {footprint} tiles of {available}"
    )]
    Infeasible {
        island_mass: u32,
        required: u32,
        footprint: u32,
        available: u32,
    },
    #[error("fair generation exceeded its deadline")]
    TimedOut,
    #[error("could not stamp the player islands after {iterations} iterations")]
    Placement { iterations: u32 },
    #[error("only {found} starting positions for {required} players")]
    TooFewStarts { found: usize, required: usize },
    #[error("internal error: {0}")]
    Internal(String),
}
