//! Abundance profiling for aggregated sample × group matrices.

use crate::data::AbundanceMatrix;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Profile of an abundance matrix before resampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixProfile {
    /// Number of samples.
    pub n_samples: usize,
    /// Number of taxon groups.
    pub n_groups: usize,
    /// Sample identifiers.
    pub sample_ids: Vec<String>,
    /// Group identifiers in matrix order.
    pub group_ids: Vec<String>,
    /// Total abundance per sample.
    pub sample_totals: Vec<f64>,
    /// Number of groups present (> 0) per sample.
    pub sample_richness: Vec<usize>,
    /// Proportion of samples in which each group is present.
    pub group_prevalence: Vec<f64>,
    /// Mean sample total.
    pub mean_total: f64,
    /// Median sample total.
    pub median_total: f64,
    /// Minimum sample total.
    pub min_total: f64,
    /// Maximum sample total.
    pub max_total: f64,
    /// Proportion of zero cells.
    pub sparsity: f64,
    /// Samples with zero total abundance.
    pub zero_samples: Vec<String>,
}

impl MatrixProfile {
    /// Pairs of all-zero samples; these take the zero-denominator value.
    pub fn n_degenerate_pairs(&self) -> usize {
        let z = self.zero_samples.len();
        z * z.saturating_sub(1) / 2
    }

    /// Get indices of samples with total abundance below a threshold.
    pub fn samples_below(&self, threshold: f64) -> Vec<usize> {
        self.sample_totals
            .iter()
            .enumerate()
            .filter(|(_, &t)| t < threshold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Groups present in every sample.
    pub fn ubiquitous_groups(&self) -> Vec<&str> {
        self.group_ids
            .iter()
            .zip(&self.group_prevalence)
            .filter(|(_, &p)| p >= 1.0)
            .map(|(g, _)| g.as_str())
            .collect()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for MatrixProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Abundance Profile")?;
        writeln!(f, "  Samples: {}", self.n_samples)?;
        writeln!(f, "  Groups:  {}", self.n_groups)?;
        writeln!(f, "  Sparsity: {:.2}%", self.sparsity * 100.0)?;
        writeln!(f, "  Mean total:   {:.1}", self.mean_total)?;
        writeln!(f, "  Median total: {:.1}", self.median_total)?;
        writeln!(f, "  Min total:    {:.1}", self.min_total)?;
        writeln!(f, "  Max total:    {:.1}", self.max_total)?;
        if !self.zero_samples.is_empty() {
            writeln!(f, "  Zero-total samples: {}", self.zero_samples.join(", "))?;
        }
        writeln!(f, "  Per sample (total / richness):")?;
        for ((id, total), richness) in self
            .sample_ids
            .iter()
            .zip(&self.sample_totals)
            .zip(&self.sample_richness)
        {
            writeln!(f, "    {}: {:.1} / {}", id, total, richness)?;
        }
        writeln!(f, "  Groups: {}", self.group_ids.join(", "))?;
        Ok(())
    }
}

/// Profile totals, richness and prevalence of an abundance matrix.
pub fn profile_matrix(matrix: &AbundanceMatrix) -> MatrixProfile {
    let n_samples = matrix.n_samples();
    let n_groups = matrix.n_groups();
    let sample_totals = matrix.sample_totals();
    let presence = matrix.presence_absence();
    let sample_richness = presence.richness();

    let group_prevalence: Vec<f64> = (0..n_groups)
        .map(|g| {
            let present = presence.vectors().iter().filter(|v| v[g] > 0).count();
            present as f64 / n_samples as f64
        })
        .collect();

    let n_cells = (n_samples * n_groups) as f64;
    let n_present: usize = sample_richness.iter().sum();
    let sparsity = if n_cells > 0.0 {
        1.0 - n_present as f64 / n_cells
    } else {
        0.0
    };

    let mean_total = if n_samples > 0 {
        sample_totals.iter().sum::<f64>() / n_samples as f64
    } else {
        0.0
    };
    let min_total = sample_totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max_total = sample_totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let zero_samples = matrix
        .sample_ids()
        .iter()
        .zip(&sample_totals)
        .filter(|(_, &t)| t == 0.0)
        .map(|(id, _)| id.clone())
        .collect();

    MatrixProfile {
        n_samples,
        n_groups,
        sample_ids: matrix.sample_ids().to_vec(),
        group_ids: matrix.group_ids().to_vec(),
        median_total: median(&sample_totals),
        sample_totals,
        sample_richness,
        group_prevalence,
        mean_total,
        min_total: if min_total.is_finite() { min_total } else { 0.0 },
        max_total: if max_total.is_finite() { max_total } else { 0.0 },
        sparsity,
        zero_samples,
    }
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
