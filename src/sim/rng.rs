//! Random sources for spawning bodies and picking targets
//!
//! Engines draw through [`RandomSource`] so tests can script the picks that
//! decide a round.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Draws needed by the engines
pub trait RandomSource {
    /// Uniform index in `0..len` (`len` must be non-zero)
    fn index(&mut self, len: usize) -> usize;
    /// Uniform value in `min..=max`; returns `min` when the range is empty
    /// or too wide to sample
    fn range(&mut self, min: f32, max: f32) -> f32;
    /// Fair coin flip
    fn coin(&mut self) -> bool;
}

/// Seeded PCG source (default for engines)
#[derive(Debug, Clone)]
pub struct PcgSource {
    seed: u64,
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgSource {
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        if !(min < max) || !(max - min).is_finite() {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Replays queued index picks, then defers to a seeded PCG.
///
/// Continuous draws (positions, speeds, signs) always come from the PCG, so
/// scripting an index never shifts body spawns.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
    fallback: PcgSource,
}

impl ScriptedSource {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self::with_seed(picks, 0)
    }

    pub fn with_seed(picks: impl IntoIterator<Item = usize>, seed: u64) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            fallback: PcgSource::new(seed),
        }
    }

    /// Queue another index pick
    pub fn push(&mut self, pick: usize) {
        self.picks.push_back(pick);
    }

    /// Picks not consumed yet
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedSource {
    fn index(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(pick) => pick.min(len.saturating_sub(1)),
            None => self.fallback.index(len),
        }
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        self.fallback.range(min, max)
    }

    fn coin(&mut self) -> bool {
        self.fallback.coin()
    }
}
