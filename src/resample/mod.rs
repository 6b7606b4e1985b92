//! Resampling primitives: bootstrap draws and label shuffles.
//!
//! Randomness is always an explicit generator handle. Parallel callers derive
//! one generator per unit of work with [`rng_for`], so output never depends on
//! thread scheduling.

mod columns;
mod rng;
mod shuffle;

pub use columns::{draw_columns, resample_columns, select_columns};
pub use rng::{counter_rng_seed, rng_for, BetaRng};
pub use shuffle::{shuffle_into, shuffled};
