//! Analysis composition and execution.

mod runner;

pub use runner::{Analysis, AnalysisConfig, AnalysisOutput, BOOTSTRAP_PHASE, PERMUTATION_PHASE};
