//! Composable Beta Diversity Library
//!
//! This library provides resampling-based estimators of pairwise community
//! dissimilarity for microbiome and other abundance data.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (AbundanceTable, AbundanceMatrix, SymmetricMatrix)
//! - **aggregate**: Group-by-and-sum of taxon rows into sample × group matrices
//! - **profile**: Data profiling (totals, richness, prevalence)
//! - **distance**: Bray-Curtis and Sørensen over condensed pair vectors
//! - **resample**: Seeded bootstrap draws and label shuffles
//! - **bootstrap**: Bray-Curtis bootstrap confidence intervals
//! - **test**: Sørensen permutation tests
//! - **correct**: Multiple testing correction (Benjamini-Hochberg)
//! - **pipeline**: Analysis composition and execution
//!
//! # Example
//!
//! ```no_run
//! use composable_beta::prelude::*;
//!
//! let table = AbundanceTable::from_csv("mags.csv").unwrap();
//!
//! let output = Analysis::new("Order", &["M24", "M25", "M26"])
//!     .bootstrap(BootstrapConfig::default())
//!     .permutation(PermutationConfig::default())
//!     .run(&table)
//!     .unwrap();
//!
//! output.write_csv("results").unwrap();
//! ```

pub mod aggregate;
pub mod bootstrap;
pub mod correct;
pub mod data;
pub mod distance;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod resample;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::aggregate::{aggregate_by_group, AggregateConfig, DEFAULT_INVALID_GROUPS};
    pub use crate::bootstrap::{bootstrap_bray_curtis, BootstrapConfig, BootstrapResult, PairInterval};
    pub use crate::correct::{correct_bh, BhCorrected};
    pub use crate::data::{AbundanceMatrix, AbundanceTable, PresenceAbsenceMatrix, SymmetricMatrix};
    pub use crate::distance::{bray_curtis, sorensen_similarity, Metric};
    pub use crate::error::{BetaError, Result};
    pub use crate::pipeline::{Analysis, AnalysisConfig, AnalysisOutput};
    pub use crate::profile::{profile_matrix, MatrixProfile};
    pub use crate::test::{test_sorensen_permutation, PairResult, PermutationConfig, PermutationResults};
}
