// Time and randomness seams, injected so the loop is deterministic in tests.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Wall-clock source for turn deadlines.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// System monotonic clock; the default outside of tests.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Randomness consumed by spawn placement and food selection.
pub trait RandomSource: Send {
    /// Uniform value in `[min, max)`.
    fn next_f32(&mut self, min: f32, max: f32) -> f32;
    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// OS-seeded randomness; the default outside of tests.
pub struct SystemRandom(StdRng);

impl SystemRandom {
    pub fn new() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn next_f32(&mut self, min: f32, max: f32) -> f32 {
        self.0.random_range(min..max)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Deterministic randomness for tests and replays.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self, min: f32, max: f32) -> f32 {
        self.0.random_range(min..max)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}
