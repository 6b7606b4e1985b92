//! Seedable, counter-derived random number generators.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generator used by every resampling routine.
pub type BetaRng = Xoshiro256PlusPlus;

/// Mix a base seed with a counter into an independent seed (SplitMix64).
///
/// Consecutive counters give well-separated streams, unlike `seed + i`.
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Generator for work item `counter` of a run seeded with `base_seed`.
pub fn rng_for(base_seed: u64, counter: u64) -> BetaRng {
    BetaRng::seed_from_u64(counter_rng_seed(base_seed, counter))
}
