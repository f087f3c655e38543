//! Seeded randomness for deals and random seat policies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random stream.
///
/// Two generators built from the same seed produce the same
/// stream on every platform, which is what makes recorded games replayable.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a value in 0..n, or 0 if n is 0.
    ///
    /// Sampling goes through u32 so the stream does not depend on the
    /// target's pointer width.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n as u32) as usize
    }

    /// Fisher-Yates, from the back of the slice
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}
