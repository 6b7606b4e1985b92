//! Bootstrap confidence intervals for Bray-Curtis dissimilarity.
//!
//! # Algorithm
//!
//! 1. Draw the taxon-group columns of the sample × group matrix with
//!    replacement, keeping every sample row
//! 2. Compute the condensed Bray-Curtis vector of the replicate
//! 3. Repeat `n_bootstrap` times to build the ensemble
//! 4. Reduce each pair position to its mean and percentile interval
//!
//! Each replicate seeds its own generator from `(seed, replicate)`, so serial
//! and parallel runs give bit-identical results.
//!
//! # Example
//!
//! ```ignore
//! use composable_beta::bootstrap::{bootstrap_bray_curtis, BootstrapConfig};
//!
//! let result = bootstrap_bray_curtis(&matrix, &BootstrapConfig::default())?;
//! println!("{}", result.mean_matrix()?);
//! ```

use super::percentile::summarize;
use crate::data::{AbundanceMatrix, SymmetricMatrix};
use crate::distance::condensed::{condensed_len, pair_index};
use crate::distance::{bray_curtis_condensed, warn_degenerate_pairs};
use crate::error::{BetaError, Result};
use crate::resample::{resample_columns, rng_for};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output file for the mean matrix.
pub const MEAN_FILE: &str = "braycurtis_bootstrap_mean.csv";
/// Output file for the lower bound matrix.
pub const LOWER_FILE: &str = "braycurtis_bootstrap_lowerCI.csv";
/// Output file for the upper bound matrix.
pub const UPPER_FILE: &str = "braycurtis_bootstrap_upperCI.csv";

/// Configuration for bootstrap estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of bootstrap replicates.
    pub n_bootstrap: usize,
    /// Columns drawn per replicate (defaults to the number of groups).
    pub sample_size: Option<usize>,
    /// Two-sided confidence level of the percentile interval.
    pub confidence: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Whether to distribute replicates across threads.
    pub parallel: bool,
    /// Drop "unclassified"/"unknown" groups before resampling.
    pub exclude_invalid_groups: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_bootstrap: 1000,
            sample_size: None,
            confidence: 0.95,
            seed: 42,
            parallel: true,
            exclude_invalid_groups: false,
        }
    }
}

impl BootstrapConfig {
    /// Create a quick configuration for testing (fewer replicates).
    pub fn quick() -> Self {
        Self {
            n_bootstrap: 100,
            ..Default::default()
        }
    }

    /// Create a thorough configuration (more replicates).
    pub fn thorough() -> Self {
        Self {
            n_bootstrap: 10000,
            ..Default::default()
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.n_bootstrap == 0 {
            return Err(BetaError::InvalidParameter(
                "n_bootstrap must be at least 1".to_string(),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(BetaError::InvalidParameter(format!(
                "confidence must lie in (0, 1), got {}",
                self.confidence
            )));
        }
        if self.sample_size == Some(0) {
            return Err(BetaError::InvalidParameter(
                "sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Lower and upper quantile probabilities of the interval.
    pub fn quantiles(&self) -> (f64, f64) {
        let tail = (1.0 - self.confidence) / 2.0;
        (tail, 1.0 - tail)
    }
}

/// Mean and interval vectors reduced from an ensemble, in condensed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedSummary {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Bootstrap estimate for a single sample pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairInterval {
    pub sample_a: String,
    pub sample_b: String,
    /// Bray-Curtis on the original matrix.
    pub observed: f64,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Result of bootstrapping Bray-Curtis dissimilarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Sample identifiers (matrix labels).
    pub sample_ids: Vec<String>,
    /// Bray-Curtis on the original matrix, condensed.
    pub observed: Vec<f64>,
    /// Mean over replicates, condensed.
    pub mean: Vec<f64>,
    /// Lower percentile bound, condensed.
    pub lower: Vec<f64>,
    /// Upper percentile bound, condensed.
    pub upper: Vec<f64>,
    /// Number of pairs where both samples were empty.
    pub n_degenerate_pairs: usize,
    /// Configuration used.
    pub config: BootstrapConfig,
}

impl BootstrapResult {
    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Mean dissimilarity matrix.
    pub fn mean_matrix(&self) -> Result<SymmetricMatrix> {
        SymmetricMatrix::from_condensed(&self.mean, self.sample_ids.clone(), 0.0)
    }

    /// Lower confidence bound matrix.
    pub fn lower_matrix(&self) -> Result<SymmetricMatrix> {
        SymmetricMatrix::from_condensed(&self.lower, self.sample_ids.clone(), 0.0)
    }

    /// Upper confidence bound matrix.
    pub fn upper_matrix(&self) -> Result<SymmetricMatrix> {
        SymmetricMatrix::from_condensed(&self.upper, self.sample_ids.clone(), 0.0)
    }

    /// Dissimilarity of the original, unresampled matrix.
    pub fn observed_matrix(&self) -> Result<SymmetricMatrix> {
        SymmetricMatrix::from_condensed(&self.observed, self.sample_ids.clone(), 0.0)
    }

    /// Estimate for a pair of sample labels.
    pub fn pair(&self, a: &str, b: &str) -> Option<PairInterval> {
        let i = self.sample_ids.iter().position(|s| s == a)?;
        let j = self.sample_ids.iter().position(|s| s == b)?;
        let k = pair_index(i, j, self.n_samples())?;
        Some(PairInterval {
            sample_a: a.to_string(),
            sample_b: b.to_string(),
            observed: self.observed[k],
            mean: self.mean[k],
            lower: self.lower[k],
            upper: self.upper[k],
        })
    }

    /// Write mean, lower and upper matrices into `dir`.
    pub fn write_csv<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        self.mean_matrix()?.to_csv(dir.join(MEAN_FILE))?;
        self.lower_matrix()?.to_csv(dir.join(LOWER_FILE))?;
        self.upper_matrix()?.to_csv(dir.join(UPPER_FILE))?;
        Ok(())
    }
}

/// Generate the bootstrap ensemble: one condensed Bray-Curtis vector per replicate.
///
/// `profiles` holds one row per sample.
pub fn bootstrap_ensemble(profiles: &[Vec<f64>], config: &BootstrapConfig) -> Result<Vec<Vec<f64>>> {
    config.validate()?;
    let n_columns = profiles.first().map_or(0, Vec::len);
    let n_draws = config.sample_size.unwrap_or(n_columns);

    let replicate = |b: usize| -> Result<Vec<f64>> {
        let mut rng = rng_for(config.seed, b as u64);
        let resampled = resample_columns(profiles, n_draws, &mut rng)?;
        bray_curtis_condensed(&resampled)
    };

    if config.parallel {
        (0..config.n_bootstrap)
            .into_par_iter()
            .map(replicate)
            .collect()
    } else {
        (0..config.n_bootstrap).map(replicate).collect()
    }
}

/// Reduce an ensemble to per-pair mean and percentile bounds.
///
/// # Errors
///
/// Fails with [`BetaError::ShapeMismatch`] if any replicate does not hold
/// exactly n(n-1)/2 values; nothing is truncated or padded.
pub fn reduce_ensemble(
    ensemble: &[Vec<f64>],
    n_samples: usize,
    lower_q: f64,
    upper_q: f64,
) -> Result<CondensedSummary> {
    if ensemble.is_empty() {
        return Err(BetaError::InvalidParameter(
            "Cannot reduce an empty ensemble".to_string(),
        ));
    }
    let expected = condensed_len(n_samples);
    for (replicate, values) in ensemble.iter().enumerate() {
        if values.len() != expected {
            return Err(BetaError::ShapeMismatch {
                replicate,
                expected,
                actual: values.len(),
            });
        }
    }

    let summaries: Vec<_> = (0..expected)
        .into_par_iter()
        .map(|pos| {
            let mut column: Vec<f64> = ensemble.iter().map(|rep| rep[pos]).collect();
            summarize(&mut column, lower_q, upper_q)
        })
        .collect();

    let mut out = CondensedSummary {
        mean: Vec::with_capacity(expected),
        lower: Vec::with_capacity(expected),
        upper: Vec::with_capacity(expected),
    };
    for summary in summaries {
        let s = summary.ok_or_else(|| BetaError::InvalidParameter("Empty ensemble position".to_string()))?;
        out.mean.push(s.mean);
        out.lower.push(s.lower);
        out.upper.push(s.upper);
    }
    Ok(out)
}

/// Estimate Bray-Curtis dissimilarity with bootstrap percentile intervals.
pub fn bootstrap_bray_curtis(matrix: &AbundanceMatrix, config: &BootstrapConfig) -> Result<BootstrapResult> {
    config.validate()?;
    if matrix.n_samples() < 2 {
        return Err(BetaError::InvalidParameter(
            "Bootstrap requires at least 2 samples".to_string(),
        ));
    }

    let n_degenerate_pairs = warn_degenerate_pairs(matrix);
    let profiles = matrix.sample_profiles();
    let observed = bray_curtis_condensed(&profiles)?;

    log::info!(
        "Bootstrapping Bray-Curtis: {} samples x {} groups, {} replicates",
        matrix.n_samples(),
        matrix.n_groups(),
        config.n_bootstrap
    );
    let ensemble = bootstrap_ensemble(&profiles, config)?;

    let (lower_q, upper_q) = config.quantiles();
    let summary = reduce_ensemble(&ensemble, matrix.n_samples(), lower_q, upper_q)?;
    log::debug!("Reduced {} replicates over {} pairs", ensemble.len(), observed.len());

    Ok(BootstrapResult {
        sample_ids: matrix.sample_ids().to_vec(),
        observed,
        mean: summary.mean,
        lower: summary.lower,
        upper: summary.upper,
        n_degenerate_pairs,
        config: config.clone(),
    })
}
