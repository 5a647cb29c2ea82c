//! Random number generation for dungeon generation
//!
//! Uses a seeded ChaCha RNG so that a seed and a configuration always
//! reproduce the same dungeon.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random source for one generation run.
///
/// Keeps the seed next to the stream so a run can report what reproduces it.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DungeonRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the stream started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform float in `[0, 1)`
    pub fn unit(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Next raw 64-bit value, used to derive seeds for retries
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Remove and return a random element, `None` when empty.
    ///
    /// Repeated calls sample without replacement.
    pub fn take<T>(&mut self, items: &mut Vec<T>) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rn2(items.len() as u32) as usize;
        Some(items.remove(idx))
    }
}
