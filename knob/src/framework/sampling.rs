//! Reproducible randomness for sketches.
//!
//! Sketches never touch a process-global generator. Instead they receive a
//! freshly seeded [`StdRng`] for the duration of a single call, so the same
//! seed always produces the same drawing no matter what else has consumed
//! random numbers in the meantime.
//!
//! ```rust
//! let xs = with_seed(42, |rng| random_range(rng, 0.0, 1.0));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::framework::util::constrain;
use crate::ternary;

/// Runs `f` with a generator seeded from `seed`. The generator is created
/// here and dropped when `f` returns.
pub fn with_seed<F, T>(seed: u64, f: F) -> T
where
    F: FnOnce(&mut StdRng) -> T,
{
    let mut rng = StdRng::seed_from_u64(seed);
    f(&mut rng)
}

/// Uniform sample in `[min, max)`. Inverted bounds are swapped and an empty
/// range returns `min`.
pub fn random_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let (lo, hi) = ternary!(min <= max, (min, max), (max, min));
    if lo == hi {
        return lo;
    }
    rng.random_range(lo..hi)
}

/// Uniform index into a collection of `len` items. Every index is equally
/// likely; `len == 0` returns 0.
pub fn random_index<R: Rng>(rng: &mut R, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    rng.random_range(0..len)
}

pub fn random_within_range_stepped<R: Rng>(
    rng: &mut R,
    min: f64,
    max: f64,
    step: f64,
) -> f64 {
    let random_value = min + rng.random_range(0.0..1.0) * (max - min);
    let quantized_value = (random_value / step).round() * step;
    constrain::clamp(quantized_value, min, max)
}
