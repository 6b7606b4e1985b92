//! Named pairwise metrics.

use super::bray_curtis::bray_curtis_condensed;
use super::condensed::pairs;
use super::sorensen::sorensen_condensed;
use crate::data::{AbundanceMatrix, SymmetricMatrix};
use crate::error::{BetaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dissimilarity metric between sample rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Abundance-weighted Bray-Curtis dissimilarity.
    BrayCurtis,
    /// 1 - Sørensen similarity over presence/absence.
    SorensenDissimilarity,
}

impl Metric {
    /// Short name used in file names and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::BrayCurtis => "braycurtis",
            Metric::SorensenDissimilarity => "sorensen",
        }
    }

    /// Condensed dissimilarity vector over the samples of `matrix`.
    pub fn condensed(&self, matrix: &AbundanceMatrix) -> Result<Vec<f64>> {
        match self {
            Metric::BrayCurtis => bray_curtis_condensed(&matrix.sample_profiles()),
            Metric::SorensenDissimilarity => {
                let pa = matrix.presence_absence();
                let similarity = sorensen_condensed(pa.vectors())?;
                Ok(similarity.into_iter().map(|s| 1.0 - s).collect())
            }
        }
    }

    /// Labeled distance matrix over the samples of `matrix` (diagonal 0).
    pub fn distance_matrix(&self, matrix: &AbundanceMatrix) -> Result<SymmetricMatrix> {
        let condensed = self.condensed(matrix)?;
        SymmetricMatrix::from_condensed(&condensed, matrix.sample_ids().to_vec(), 0.0)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = BetaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "braycurtis" | "bc" => Ok(Metric::BrayCurtis),
            "sorensen" | "sørensen" | "sorensendissimilarity" => Ok(Metric::SorensenDissimilarity),
            _ => Err(BetaError::InvalidParameter(format!("Unknown metric '{}'", s))),
        }
    }
}

/// Sample pairs where both samples have zero total abundance.
///
/// These pairs fall back to the zero-denominator policy (distance 0,
/// similarity 0) instead of failing.
pub fn degenerate_pairs(matrix: &AbundanceMatrix) -> Vec<(usize, usize)> {
    let totals = matrix.sample_totals();
    pairs(matrix.n_samples())
        .filter(|&(i, j)| totals[i] == 0.0 && totals[j] == 0.0)
        .collect()
}

/// Log a warning for every degenerate pair in `matrix`.
pub(crate) fn warn_degenerate_pairs(matrix: &AbundanceMatrix) -> usize {
    let degenerate = degenerate_pairs(matrix);
    for &(i, j) in &degenerate {
        log::warn!(
            "Samples '{}' and '{}' both have zero total abundance; using the zero-denominator value",
            matrix.sample_ids()[i],
            matrix.sample_ids()[j]
        );
    }
    degenerate.len()
}
