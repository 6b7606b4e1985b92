//! Bootstrap confidence intervals for pairwise dissimilarity.

mod ci;
mod percentile;

pub use ci::{
    bootstrap_bray_curtis, bootstrap_ensemble, reduce_ensemble, BootstrapConfig, BootstrapResult,
    CondensedSummary, PairInterval, LOWER_FILE, MEAN_FILE, UPPER_FILE,
};
pub use percentile::{percentile, percentile_sorted, summarize, Summary};
