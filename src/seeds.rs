//! Seed management for island generation.
//!
//! Seeds are 31-bit positive integers stored in a `u32`; `0` is the sentinel
//! for "pick a random seed". Every stage that needs randomness builds its own
//! explicit PRNG from the seed (plus a fixed salt where streams must not
//! overlap), so runs are composable and reproducible.

use rand::Rng;

/// Seeds live in `1..SEED_MODULUS`.
pub const SEED_MODULUS: u32 = 2_147_483_647;

/// Sentinel value requesting a randomly drawn seed.
pub const RANDOM_SEED: u32 = 0;

/// Draw a fresh random seed in `1..SEED_MODULUS`.
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(1..SEED_MODULUS)
}

/// Resolve a requested seed: `0` draws a random one, anything else passes
/// through unchanged.
pub fn resolve(seed: u32) -> u32 {
    if seed == RANDOM_SEED {
        random_seed()
    } else {
        seed
    }
}

/// Deterministic successor seed used between retry passes for non-random
/// seeds: `(seed + 1) mod (2^31 - 1)`.
pub fn advance(seed: u32) -> u32 {
    ((seed as u64 + 1) % SEED_MODULUS as u64) as u32
}

/// Salted seed for the border randomization pass:
/// `((seed + 337) * 312432) mod (2^31 - 1)`.
pub fn border_seed(seed: u32) -> u32 {
    (((seed as u64 + 337) * 312_432) % SEED_MODULUS as u64) as u32
}
