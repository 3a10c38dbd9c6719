/// Deterministic value in `[0, 1)` for an integer key.
///
/// The value is the fractional part of `sin(key) * 10000`, so it depends on
/// nothing but `key` and is stable across runs and processes.
pub fn seeded_value(key: i64) -> f64 {
    let x = (key as f64).sin() * 10000.0;
    let fraction = x - x.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative x
    if fraction >= 1.0 {
        0.0
    } else {
        fraction
    }
}

/// Picks an index in `0..len` using the seeded value for `key`.
pub fn seeded_index(key: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let index = (seeded_value(key) * len as f64).floor() as usize;
    index.min(len - 1)
}

/// Derives a generation seed from an identifier: its decimal digits read as
/// one number, reduced modulo 1000. Identifiers without digits give 0.
pub fn derive_seed(source: &str) -> i64 {
    source
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0i64, |acc, digit| (acc * 10 + digit as i64) % 1000)
}
