//! Random sources scoped to a single anonymization run.
//!
//! Nothing in this crate draws from a process-wide generator while transforming data. Every
//! column gets its own [`StdRng`], seeded from the run's base seed and a stream key (the column
//! name, or the correlation id for correlated noise), so runs with a fixed seed are reproducible
//! and concurrent runs cannot interfere with each other.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Derives a 64-bit seed for the stream identified by `key` from `base_seed`.
pub(crate) fn derive_seed(base_seed: u64, key: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&base_seed.to_le_bytes());
    hasher.update(key.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

pub(crate) fn stream(base_seed: u64, key: &str) -> StdRng {
    StdRng::seed_from_u64(derive_seed(base_seed, key))
}

/// A fresh seed for runs that were not given one.
pub(crate) fn random_seed() -> u64 {
    rand::random()
}

/// Standard normal sample (Box-Muller).
pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // `gen` yields [0, 1); 1 - u keeps the logarithm finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Laplace sample with location 0 and scale 1 (inverse CDF).
pub(crate) fn standard_laplace<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = rng.gen::<f64>() - 0.5;
    let tail = (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE);
    -u.signum() * tail.ln()
}

/// Uniform sample in [-1, 1).
pub(crate) fn symmetric_uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..1.0)
}
