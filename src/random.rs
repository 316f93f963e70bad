/*

    Seeded random number generation.

    Engines are plain values owned by whoever needs determinism;
    there is no process-wide generator. Call sites that do not
    care about reproducibility can use random_float() instead.

*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::numeric::Float;

/// A seeded generator wrapping [`StdRng`]. The seed is kept so a
/// run can be logged and replayed.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    seed: u64,
    rng: StdRng,
}

impl RandomEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A fresh engine with an OS-provided seed. The drawn seed is
    /// still recorded and retrievable through [`RandomEngine::seed`].
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in [0, 1).
    pub fn next_float(&mut self) -> Float {
        self.rng.random()
    }

    /// Uniform in [min, max). `min` must be below `max`.
    pub fn next_range(&mut self, min: Float, max: Float) -> Float {
        self.rng.random_range(min..max)
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.random()
    }

    /// Direct access to the underlying generator for use with the
    /// rand traits.
    pub fn gen_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Uniform in [0, 1) from the thread-local generator.
pub fn random_float() -> Float {
    rand::rng().random()
}
