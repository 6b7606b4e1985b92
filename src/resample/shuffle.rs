//! Label shuffles (permutation without replacement).

use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly random rearrangement of `values`; the input is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> Vec<T> {
    let mut out = values.to_vec();
    out.shuffle(rng);
    out
}

/// Copy `values` into `buffer` and shuffle it in place.
///
/// `buffer` must have the same length as `values`.
pub fn shuffle_into<T: Copy, R: Rng + ?Sized>(values: &[T], buffer: &mut [T], rng: &mut R) {
    buffer.copy_from_slice(values);
    buffer.shuffle(rng);
}
