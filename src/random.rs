//! The seeded random number generator shared by every generation step.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore};

const MULTIPLIER: u64 = 1_664_525;
const INCREMENT: u64 = 1_013_904_223;
const STATE_MASK: u64 = 0xFFFF_FFFF;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A 32-bit linear congruential generator.
///
/// Every value is a pure function of the seed and the number of draws made so far, so two
/// generators created from the same seed string produce the same stream.
///
/// It implements [`RngCore`], which means the helpers of [`rand::Rng`] (`random_range`,
/// `random_bool`, slice shuffling...) can be used on it and still draw from this one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRng {
    state: u32,
}

impl MapRng {
    /// Creates a generator from a raw 32-bit state.
    pub const fn new(state: u32) -> Self {
        Self { state }
    }

    /// Creates a generator from a seed string by hashing it with 32-bit FNV-1a.
    pub fn from_seed_str(seed: &str) -> Self {
        let state = seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
        });
        Self::new(state)
    }

    /// Returns the current internal state.
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Returns a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.advance() as f64 / (STATE_MASK + 1) as f64
    }

    /// Returns an integer in `[0, n)`, or `0` when `n` is `0`.
    ///
    /// Unlike [`Rng::random_range`] this accepts an empty range, which the recursive height
    /// generators rely on when their perturbation span shrinks to nothing.
    pub fn rand_below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as u32).min(n - 1)
    }

    fn advance(&mut self) -> u32 {
        self.state = ((self.state as u64 * MULTIPLIER + INCREMENT) & STATE_MASK) as u32;
        self.state
    }
}

impl RngCore for MapRng {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.advance() as u64;
        let low = self.advance() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Builds a fresh seed string from several entropy sources.
///
/// The operating system generator, the wall clock and the process id are mixed so that two
/// processes started in the same nanosecond still receive different seeds.
pub fn generate_seed() -> String {
    let os_entropy: u64 = rand::rng().random();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos() as u64)
        .unwrap_or_default();
    let process_id = std::process::id() as u64;

    let mixed = os_entropy ^ nanos.rotate_left(17) ^ process_id.rotate_left(41);
    format!("{mixed:016x}")
}
