//! Random range helper
//!
//! Generic over `rand::Rng` so a session can run on a seeded `Pcg32`
//! (deterministic tests, replays) or on any other generator.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Uniform integer in the inclusive range `[min, max]`
///
/// Bounds given in the wrong order are swapped rather than panicking.
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// Session generator for a given seed
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
