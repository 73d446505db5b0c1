//! Seeded uniform generator for platform layouts
//!
//! The world calls [`RunRng::next`] once for the width ratio and then once for
//! the roof offset of every generated platform. Keeping that order fixed is what
//! makes a seed reproduce a layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// How a session picks its seed on every (re)start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Same seed every time (replays are identical)
    Fixed(u64),
    /// Fresh seed every time
    Entropy,
}

impl SeedPolicy {
    /// Resolve the policy to a concrete seed
    pub fn pick(&self) -> u64 {
        match self {
            SeedPolicy::Fixed(seed) => *seed,
            SeedPolicy::Entropy => rand::random(),
        }
    }
}

/// Deterministic uniform float generator
///
/// Serializes as its seed and the number of values drawn so far, so a restored
/// generator continues the same stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct RunRng {
    seed: u64,
    draws: u64,
    rng: Pcg32,
}

/// Serialized form of [`RunRng`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl From<RngState> for RunRng {
    fn from(state: RngState) -> Self {
        let mut rng = Self::seeded(state.seed);
        for _ in 0..state.draws {
            rng.next(0.0, 1.0);
        }
        rng
    }
}

impl From<RunRng> for RngState {
    fn from(rng: RunRng) -> Self {
        Self {
            seed: rng.seed,
            draws: rng.draws,
        }
    }
}

impl RunRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Unseeded generator (seed drawn from the OS)
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Values drawn since the last (re)seed
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Restart the stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::seeded(seed);
    }

    /// Uniform value in `[min, max)`; returns `min` when the range is empty
    pub fn next(&mut self, min: f32, max: f32) -> f32 {
        let unit: f32 = self.rng.random();
        self.draws += 1;
        min + unit * (max - min)
    }
}
