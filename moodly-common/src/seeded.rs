//! Deterministic pseudo-random values derived from seed strings
//!
//! Avatar colors and demo reviewers must look random but render identically on
//! every reload without being persisted. Everything here is a pure function of
//! the seed text: same seed, same value, in any process.

/// Resolution of [`seeded_random`]: values are multiples of `1 / SEED_BUCKETS`
pub const SEED_BUCKETS: u32 = 1000;

/// Order-dependent polynomial hash of `seed` folded into a signed 32-bit integer
///
/// Computes `h = h * 31 + unit` over the UTF-16 code units of `seed` with
/// wrapping arithmetic, matching hashes previously stored by the web client.
pub fn string_hash(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Pseudo-random float in `[0, 1)` fully determined by `seed`
pub fn seeded_random(seed: &str) -> f64 {
    let hash = string_hash(seed);
    f64::from(hash.unsigned_abs() % SEED_BUCKETS) / f64::from(SEED_BUCKETS)
}

/// Deterministic index into a collection of `len` elements
///
/// Returns 0 when `len` is 0 so callers can guard with `get`.
pub fn seeded_index(seed: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((seeded_random(seed) * len as f64) as usize).min(len - 1)
}

/// Deterministically pick one element of `items`
pub fn seeded_pick<'a, T>(seed: &str, items: &'a [T]) -> Option<&'a T> {
    items.get(seeded_index(seed, items.len()))
}

/// Deterministic integer in `[min, max]` (inclusive)
pub fn seeded_range(seed: &str, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    let span = (max - min + 1) as f64;
    min + ((seeded_random(seed) * span) as i64).min(max - min)
}
