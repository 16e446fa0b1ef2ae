use ahash::RandomState;
use rand::Rng;
use std::collections::HashMap as StdHashMap;

pub type HashMap<K, V> = StdHashMap<K, V, RandomState>;

/// `ternary!(cond, true_case, false_case)`
#[macro_export]
macro_rules! ternary {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition { $_true } else { $_false }
    };
}

/// Utilities to contain a value within a range
pub mod constrain {
    /// Clamp a value between min and max. Unlike [`f64::clamp`] this does not
    /// panic when `min > max`; the bounds are swapped instead.
    pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        value.max(min).min(max)
    }
}

/// Linear interpolation between two values. Returns a value between `start` and
/// `end` based on the interpolation parameter `t` (typically 0.0 to 1.0).
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Naive uuid generator
pub fn uuid(length: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

pub(crate) fn uuid_5() -> String {
    uuid(5)
}
