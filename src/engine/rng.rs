//! Deterministic random number generation.
//!
//! Implements PCG (Permuted Congruential Generator) seeded from a master seed.
//! Given the same seed, every sequence is bitwise-identical across runs and
//! platforms, which is what makes a model reset reproducible.

use rand::prelude::*;
use rand_pcg::Pcg64;

/// Deterministic, reproducible random number generator.
#[derive(Debug, Clone)]
pub struct SimRng {
    /// Master seed for reproducibility.
    master_seed: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Rewind to the start of the master-seed sequence.
    pub fn reseed(&mut self) {
        self.rng = Pcg64::seed_from_u64(self.master_seed);
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random f64 in `[min, max)`.
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn gen_range_f64(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        lo + (hi - lo) * self.gen_f64()
    }

    /// Generate a random f64 in `[-half_width, half_width)`.
    pub fn gen_symmetric(&mut self, half_width: f64) -> f64 {
        (self.gen_f64() - 0.5) * 2.0 * half_width
    }
}
