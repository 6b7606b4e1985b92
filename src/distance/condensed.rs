//! Condensed pairwise vectors.
//!
//! A condensed vector stores the strict upper triangle of an N × N symmetric
//! matrix row by row: (0,1), (0,2), ..., (0,N-1), (1,2), ..., (N-2,N-1).
//! Every producer and consumer in the crate goes through this module so the
//! enumeration order cannot drift between components.

use crate::error::{BetaError, Result};

/// Number of unordered pairs among `n` items.
#[inline]
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of pair (i, j) in a condensed vector over `n` items.
///
/// The pair is unordered; `i == j` has no position and returns `None`.
pub fn pair_index(i: usize, j: usize, n: usize) -> Option<usize> {
    if i == j || i >= n || j >= n {
        return None;
    }
    let (a, b) = if i < j { (i, j) } else { (j, i) };
    // Pairs preceding row `a`: sum_{r<a} (n - 1 - r)
    Some(a * (2 * n - a - 1) / 2 + (b - a - 1))
}

/// Recover the number of items from a condensed length.
pub fn n_from_condensed_len(len: usize) -> Result<usize> {
    // n(n-1)/2 = len  =>  n = (1 + sqrt(1 + 8 len)) / 2
    let n = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round() as usize;
    if condensed_len(n) != len {
        return Err(BetaError::InvalidParameter(format!(
            "{} is not a valid condensed length",
            len
        )));
    }
    Ok(n)
}

/// Iterator over (i, j), i < j, in condensed order.
#[derive(Debug, Clone)]
pub struct Pairs {
    n: usize,
    i: usize,
    j: usize,
}

impl Iterator for Pairs {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.n < 2 || self.i >= self.n - 1 {
            return None;
        }
        let pair = (self.i, self.j);
        self.j += 1;
        if self.j == self.n {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.n < 2 || self.i >= self.n - 1 {
            0
        } else {
            condensed_len(self.n) - pair_index(self.i, self.j, self.n).unwrap_or(0)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Pairs {}

/// All unordered pairs among `n` items in condensed order.
pub fn pairs(n: usize) -> Pairs {
    Pairs { n, i: 0, j: 1 }
}

/// Compute a condensed vector by applying `f` to every row pair.
///
/// All rows must have the same length.
pub fn pdist<T, F>(rows: &[Vec<T>], f: F) -> Result<Vec<f64>>
where
    F: Fn(&[T], &[T]) -> f64,
{
    if let Some(first) = rows.first() {
        for row in rows {
            if row.len() != first.len() {
                return Err(BetaError::DimensionMismatch {
                    expected: first.len(),
                    actual: row.len(),
                });
            }
        }
    }
    Ok(pairs(rows.len())
        .map(|(i, j)| f(&rows[i], &rows[j]))
        .collect())
}

/// Verify that a condensed vector matches `n` items.
pub fn check_condensed(values: &[f64], n: usize) -> Result<()> {
    let expected = condensed_len(n);
    if values.len() != expected {
        return Err(BetaError::DimensionMismatch {
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}
