//! Dense sample × taxon-group abundance matrix.

use crate::error::{BetaError, Result};
use nalgebra::DMatrix;
use std::collections::HashMap;

/// Summed abundances per sample and taxon group.
///
/// Rows represent samples, columns represent taxon groups. Label order is fixed
/// at construction and never depends on hash iteration order.
#[derive(Debug, Clone)]
pub struct AbundanceMatrix {
    /// Dense matrix (samples × groups).
    data: DMatrix<f64>,
    /// Sample identifiers (row names).
    sample_ids: Vec<String>,
    /// Group identifiers (column names).
    group_ids: Vec<String>,
    sample_index: HashMap<String, usize>,
    group_index: HashMap<String, usize>,
}

impl AbundanceMatrix {
    /// Create a new matrix from dense data and identifiers.
    ///
    /// Values must be finite and non-negative; labels must be unique.
    pub fn new(data: DMatrix<f64>, sample_ids: Vec<String>, group_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != sample_ids.len() {
            return Err(BetaError::DimensionMismatch {
                expected: nrows,
                actual: sample_ids.len(),
            });
        }
        if ncols != group_ids.len() {
            return Err(BetaError::DimensionMismatch {
                expected: ncols,
                actual: group_ids.len(),
            });
        }
        if nrows == 0 {
            return Err(BetaError::EmptyData("Matrix has no samples".to_string()));
        }
        if ncols == 0 {
            return Err(BetaError::EmptyData("Matrix has no taxon groups".to_string()));
        }

        for row in 0..nrows {
            for col in 0..ncols {
                let value = data[(row, col)];
                if !value.is_finite() || value < 0.0 {
                    return Err(BetaError::InvalidCount {
                        value: value.to_string(),
                        row,
                        column: group_ids[col].clone(),
                    });
                }
            }
        }

        let sample_index = index_labels(&sample_ids)?;
        let group_index = index_labels(&group_ids)?;

        Ok(Self {
            data,
            sample_ids,
            group_ids,
            sample_index,
            group_index,
        })
    }

    /// Build from row-major sample profiles.
    pub fn from_rows(rows: &[Vec<f64>], sample_ids: Vec<String>, group_ids: Vec<String>) -> Result<Self> {
        let ncols = group_ids.len();
        for row in rows {
            if row.len() != ncols {
                return Err(BetaError::DimensionMismatch {
                    expected: ncols,
                    actual: row.len(),
                });
            }
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = DMatrix::from_row_slice(rows.len(), ncols, &flat);
        Self::new(data, sample_ids, group_ids)
    }

    /// Value for (sample, group).
    #[inline]
    pub fn get(&self, sample: usize, group: usize) -> f64 {
        self.data[(sample, group)]
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of taxon groups (columns).
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.data.ncols()
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Group identifiers.
    #[inline]
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    /// Row position of a sample label.
    pub fn sample_position(&self, sample_id: &str) -> Option<usize> {
        self.sample_index.get(sample_id).copied()
    }

    /// Column position of a group label.
    pub fn group_position(&self, group_id: &str) -> Option<usize> {
        self.group_index.get(group_id).copied()
    }

    /// Underlying dense matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Abundance profile of one sample across all groups.
    pub fn sample_profile(&self, sample: usize) -> Vec<f64> {
        self.data.row(sample).iter().copied().collect()
    }

    /// All sample profiles in row order.
    pub fn sample_profiles(&self) -> Vec<Vec<f64>> {
        (0..self.n_samples()).map(|i| self.sample_profile(i)).collect()
    }

    /// Total abundance per sample.
    pub fn sample_totals(&self) -> Vec<f64> {
        (0..self.n_samples()).map(|i| self.data.row(i).sum()).collect()
    }

    /// Group × sample orientation (the layout of the input table).
    pub fn group_major(&self) -> DMatrix<f64> {
        self.data.transpose()
    }

    /// Threshold at > 0 into a presence/absence matrix.
    pub fn presence_absence(&self) -> PresenceAbsenceMatrix {
        let vectors = (0..self.n_samples())
            .map(|i| {
                self.data
                    .row(i)
                    .iter()
                    .map(|&v| u8::from(v > 0.0))
                    .collect()
            })
            .collect();
        PresenceAbsenceMatrix {
            vectors,
            sample_ids: self.sample_ids.clone(),
            group_ids: self.group_ids.clone(),
        }
    }
}

/// Binary presence (1) / absence (0) of each taxon group per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceAbsenceMatrix {
    /// One binary vector per sample, in sample order.
    vectors: Vec<Vec<u8>>,
    sample_ids: Vec<String>,
    group_ids: Vec<String>,
}

impl PresenceAbsenceMatrix {
    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.vectors.len()
    }

    /// Number of taxon groups.
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.group_ids.len()
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Group identifiers.
    #[inline]
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    /// Binary vector for one sample.
    #[inline]
    pub fn sample_vector(&self, sample: usize) -> &[u8] {
        &self.vectors[sample]
    }

    /// All binary vectors in sample order.
    #[inline]
    pub fn vectors(&self) -> &[Vec<u8>] {
        &self.vectors
    }

    /// Number of groups present per sample.
    pub fn richness(&self) -> Vec<usize> {
        self.vectors
            .iter()
            .map(|v| v.iter().map(|&x| x as usize).sum())
            .collect()
    }
}

fn index_labels(labels: &[String]) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(labels.len());
    for (pos, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), pos).is_some() {
            return Err(BetaError::DuplicateLabel(label.clone()));
        }
    }
    Ok(index)
}
