//! Random numeric code generation

use rand::{distributions::Uniform, rngs::OsRng, Rng};

/// Generate a random numeric code of `length` decimal digits
///
/// Uses OsRng (OS-provided CSPRNG) with per-digit uniform sampling, so
/// every digit is drawn independently from 0-9 with no modulo bias.
///
/// A failing randomness source is unrecoverable by contract; OsRng
/// panics rather than returning degraded output.
pub fn generate_code(length: usize) -> String {
    debug_assert!(length > 0, "code length must be positive");
    let digit = Uniform::from(0u8..10);
    OsRng
        .sample_iter(digit)
        .take(length)
        .map(|d| char::from(b'0' + d))
        .collect()
}
