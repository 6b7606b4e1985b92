//! Pairwise distance and similarity between samples.

mod bray_curtis;
pub mod condensed;
mod metric;
mod sorensen;

pub use bray_curtis::{bray_curtis, bray_curtis_condensed};
pub use condensed::{condensed_len, pair_index, pairs, pdist};
pub use metric::{degenerate_pairs, Metric};
pub(crate) use metric::warn_degenerate_pairs;
pub use sorensen::{sorensen_condensed, sorensen_dissimilarity, sorensen_similarity, SorensenCounts};
