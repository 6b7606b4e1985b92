//! Symmetric, sample-labeled square matrices.
//!
//! These are the exchange format between the resampling engines and their
//! consumers: CSV export, console display and ordination.

use crate::distance::condensed::{check_condensed, pairs};
use crate::error::{BetaError, Result};
use nalgebra::DMatrix;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Digits shown when a matrix is displayed.
pub const DISPLAY_PRECISION: usize = 3;

/// A square matrix with identical row and column labels and M[i][j] == M[j][i].
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix {
    data: DMatrix<f64>,
    ids: Vec<String>,
}

impl SymmetricMatrix {
    /// Expand a condensed vector into a full matrix with the given diagonal.
    ///
    /// This is the exact inverse of [`SymmetricMatrix::to_condensed`].
    pub fn from_condensed(condensed: &[f64], ids: Vec<String>, diagonal: f64) -> Result<Self> {
        let n = ids.len();
        check_condensed(condensed, n)?;
        check_unique(&ids)?;

        let mut data = DMatrix::from_element(n, n, diagonal);
        for ((i, j), &value) in pairs(n).zip(condensed) {
            data[(i, j)] = value;
            data[(j, i)] = value;
        }
        Ok(Self { data, ids })
    }

    /// Build from a per-pair function evaluated over i < j.
    pub fn from_pairs<F>(ids: Vec<String>, diagonal: f64, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        check_unique(&ids)?;
        let n = ids.len();
        let mut data = DMatrix::from_element(n, n, diagonal);
        for (i, j) in pairs(n) {
            let value = f(i, j);
            data[(i, j)] = value;
            data[(j, i)] = value;
        }
        Ok(Self { data, ids })
    }

    /// Wrap an existing square matrix, checking symmetry.
    pub fn from_dense(data: DMatrix<f64>, ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != ncols {
            return Err(BetaError::DimensionMismatch {
                expected: nrows,
                actual: ncols,
            });
        }
        if nrows != ids.len() {
            return Err(BetaError::DimensionMismatch {
                expected: nrows,
                actual: ids.len(),
            });
        }
        check_unique(&ids)?;
        let matrix = Self { data, ids };
        if !matrix.is_symmetric(0.0) {
            return Err(BetaError::InvalidParameter(
                "Matrix is not symmetric".to_string(),
            ));
        }
        Ok(matrix)
    }

    /// Read the strict upper triangle back out in condensed order.
    pub fn to_condensed(&self) -> Vec<f64> {
        pairs(self.n()).map(|(i, j)| self.data[(i, j)]).collect()
    }

    /// Matrix dimension.
    #[inline]
    pub fn n(&self) -> usize {
        self.ids.len()
    }

    /// Row/column labels.
    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Value at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[(i, j)]
    }

    /// Value for a pair of labels.
    pub fn get_by_id(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.ids.iter().position(|id| id == a)?;
        let j = self.ids.iter().position(|id| id == b)?;
        Some(self.data[(i, j)])
    }

    /// Underlying dense matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Apply `f` elementwise, diagonal included.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            data: self.data.map(f),
            ids: self.ids.clone(),
        }
    }

    /// 1 - M, turning a similarity into a dissimilarity or back.
    pub fn complement(&self) -> Self {
        self.map(|v| 1.0 - v)
    }

    /// Check M[i][j] == M[j][i] within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        pairs(self.n()).all(|(i, j)| (self.data[(i, j)] - self.data[(j, i)]).abs() <= tolerance)
    }

    /// Check that every entry lies in [0, 1].
    pub fn is_unit_bounded(&self) -> bool {
        self.data.iter().all(|&v| (0.0..=1.0).contains(&v))
    }

    /// Validate the matrix as input to an ordination routine.
    ///
    /// A distance matrix must be symmetric, finite, non-negative, have a zero
    /// diagonal and at least two samples.
    pub fn validate_distance(&self) -> Result<()> {
        if self.n() < 2 {
            return Err(BetaError::InvalidParameter(
                "Distance matrix needs at least 2 samples".to_string(),
            ));
        }
        if !self.is_symmetric(0.0) {
            return Err(BetaError::InvalidParameter(
                "Distance matrix is not symmetric".to_string(),
            ));
        }
        for i in 0..self.n() {
            if self.data[(i, i)] != 0.0 {
                return Err(BetaError::InvalidParameter(format!(
                    "Distance matrix has non-zero diagonal for '{}'",
                    self.ids[i]
                )));
            }
        }
        if let Some(v) = self.data.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(BetaError::InvalidParameter(format!(
                "Distance matrix contains invalid value {}",
                v
            )));
        }
        Ok(())
    }

    /// Write as CSV with labels as header and row index, full precision.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.n() + 1);
        header.push(String::new());
        header.extend(self.ids.iter().cloned());
        csv_writer.write_record(&header)?;

        for (i, id) in self.ids.iter().enumerate() {
            let mut record = Vec::with_capacity(self.n() + 1);
            record.push(id.clone());
            record.extend((0..self.n()).map(|j| self.data[(i, j)].to_string()));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write to a CSV file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Read a matrix previously written with [`SymmetricMatrix::to_csv`].
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        let ids: Vec<String> = reader.headers()?.iter().skip(1).map(String::from).collect();
        let n = ids.len();

        let mut values = Vec::with_capacity(n * n);
        let mut n_rows = 0;
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (col, cell) in record.iter().skip(1).enumerate() {
                let value: f64 = cell.trim().parse().map_err(|_| BetaError::InvalidCount {
                    value: cell.to_string(),
                    row,
                    column: ids.get(col).cloned().unwrap_or_default(),
                })?;
                values.push(value);
            }
            n_rows += 1;
        }
        if n_rows != n || values.len() != n * n {
            return Err(BetaError::DimensionMismatch {
                expected: n * n,
                actual: values.len(),
            });
        }

        Self::from_dense(DMatrix::from_row_slice(n, n, &values), ids)
    }
}

impl fmt::Display for SymmetricMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .ids
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(DISPLAY_PRECISION + 2);

        write!(f, "{:width$}", "", width = width)?;
        for id in &self.ids {
            write!(f, "  {:>width$}", id, width = width)?;
        }
        writeln!(f)?;

        for (i, id) in self.ids.iter().enumerate() {
            write!(f, "{:<width$}", id, width = width)?;
            for j in 0..self.n() {
                write!(
                    f,
                    "  {:>width$.prec$}",
                    self.data[(i, j)],
                    width = width,
                    prec = DISPLAY_PRECISION
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_unique(ids: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(BetaError::DuplicateLabel(id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn abc() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn test_from_condensed() {
        let m = SymmetricMatrix::from_condensed(&[0.5, 1.0, 0.25], abc(), 0.0).unwrap();
        assert_eq!(m.get(0, 1), 0.5);
        assert_eq!(m.get(1, 0), 0.5);
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(2, 1), 0.25);
        assert_eq!(m.get(1, 1), 0.0);
        assert_eq!(m.get_by_id("C", "A"), Some(1.0));
    }

    #[test]
    fn test_from_pairs_matches_from_condensed() {
        let condensed = [0.5, 1.0, 0.25];
        let table = [((0, 1), 0.5), ((0, 2), 1.0), ((1, 2), 0.25)];
        let m = SymmetricMatrix::from_pairs(abc(), 1.0, |i, j| {
            table
                .iter()
                .find(|(pair, _)| *pair == (i, j))
                .map_or(f64::NAN, |(_, v)| *v)
        })
        .unwrap();
        assert_eq!(m, SymmetricMatrix::from_condensed(&condensed, abc(), 1.0).unwrap());
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
        }
        assert_eq!(m.get_by_id("C", "B"), Some(0.25));
    }

    #[test]
    fn test_from_pairs_rejects_duplicate_ids() {
        let ids = vec!["A".to_string(), "B".to_string(), "A".to_string()];
        let result = SymmetricMatrix::from_pairs(ids, 0.0, |_, _| 0.5);
        assert!(matches!(result, Err(BetaError::DuplicateLabel(id)) if id == "A"));
    }

    #[test]
    fn test_condense_roundtrip() {
        let condensed = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let ids: Vec<String> = (0..4).map(|i| format!("S{}", i)).collect();
        let m = SymmetricMatrix::from_condensed(&condensed, ids, 1.0).unwrap();
        assert_eq!(m.to_condensed(), condensed);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result = SymmetricMatrix::from_condensed(&[0.5, 1.0], abc(), 0.0);
        assert!(matches!(result, Err(BetaError::DimensionMismatch { expected: 3, actual: 2 })));
    }

    #[test]
    fn test_complement() {
        let sim = SymmetricMatrix::from_condensed(&[0.25, 0.5, 1.0], abc(), 1.0).unwrap();
        let dis = sim.complement();
        assert_eq!(dis.get(0, 0), 0.0);
        assert_eq!(dis.get(0, 1), 0.75);
        assert!(dis.validate_distance().is_ok());
    }

    #[test]
    fn test_validate_distance_rejects_diagonal() {
        let m = SymmetricMatrix::from_condensed(&[0.25, 0.5, 1.0], abc(), 1.0).unwrap();
        assert!(m.validate_distance().is_err());
    }

    #[test]
    fn test_from_dense_rejects_asymmetric() {
        let data = DMatrix::from_row_slice(2, 2, &[0.0, 0.1, 0.2, 0.0]);
        let result = SymmetricMatrix::from_dense(data, vec!["A".to_string(), "B".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_roundtrip() {
        let m = SymmetricMatrix::from_condensed(&[1.0 / 3.0, 0.7, 0.125], abc(), 0.0).unwrap();
        let file = NamedTempFile::new().unwrap();
        m.to_csv(file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with(",A,B,C"));

        let loaded = SymmetricMatrix::from_csv(file.path()).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn test_display_is_rounded() {
        let m = SymmetricMatrix::from_condensed(&[1.0 / 3.0, 0.5, 1.0], abc(), 0.0).unwrap();
        let text = m.to_string();
        assert!(text.contains("0.333"));
        assert!(!text.contains("0.3333"));
    }
}
