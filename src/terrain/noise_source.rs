//! Deterministic 2D noise fields

use noise::{NoiseFn, Simplex};
use xxhash_rust::xxh32::xxh32;

/// A pure 2D scalar field in `[-1, 1]`.
///
/// Implementations must be deterministic: the same input always yields the
/// same output. `Send + Sync` lets chunk bodies be built on a thread pool.
pub trait NoiseSource: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Simplex noise seeded from a string
#[derive(Clone)]
pub struct SeededNoise {
    seed: u32,
    noise: Simplex,
}

impl SeededNoise {
    /// Build the field for a seed string. Equal strings give equal fields.
    pub fn new(seed: &str) -> Self {
        let seed = seed_from_str(seed);
        Self {
            seed,
            noise: Simplex::new(seed),
        }
    }

    /// Numeric seed derived from the seed string
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y])
    }
}

/// Hash a seed string to the `u32` seed the noise generator takes
pub fn seed_from_str(seed: &str) -> u32 {
    xxh32(seed.as_bytes(), 0)
}
