//! Sørensen similarity between presence/absence vectors.

use super::condensed::pdist;
use crate::error::Result;

/// Shared and total presence counts for a pair of binary vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SorensenCounts {
    /// Positions where both vectors are 1.
    pub shared: usize,
    /// |a|₁ + |b|₁.
    pub total: usize,
}

impl SorensenCounts {
    /// Tally a pair of binary vectors of equal length.
    pub fn tally(a: &[u8], b: &[u8]) -> Self {
        debug_assert_eq!(a.len(), b.len());
        let mut shared = 0;
        let mut total = 0;
        for (&x, &y) in a.iter().zip(b) {
            let (x, y) = (usize::from(x > 0), usize::from(y > 0));
            shared += x & y;
            total += x + y;
        }
        Self { shared, total }
    }

    /// 2·shared / total, or 0 when neither vector has any presence.
    #[inline]
    pub fn similarity(&self) -> f64 {
        if self.total > 0 {
            (2 * self.shared) as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

/// Sørensen similarity in [0, 1]. Two all-zero vectors have similarity 0.
pub fn sorensen_similarity(a: &[u8], b: &[u8]) -> f64 {
    SorensenCounts::tally(a, b).similarity()
}

/// 1 - Sørensen similarity.
pub fn sorensen_dissimilarity(a: &[u8], b: &[u8]) -> f64 {
    1.0 - sorensen_similarity(a, b)
}

/// Condensed Sørensen similarity vector over binary rows.
pub fn sorensen_condensed(vectors: &[Vec<u8>]) -> Result<Vec<f64>> {
    pdist(vectors, sorensen_similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_known_value() {
        // shared = 1, total = 3
        let s = sorensen_similarity(&[1, 1, 0], &[1, 0, 0]);
        assert_abs_diff_eq!(s, 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sorensen_dissimilarity(&[1, 1, 0], &[1, 0, 0]), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_is_one() {
        assert_eq!(sorensen_similarity(&[1, 0, 1, 1], &[1, 0, 1, 1]), 1.0);
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert_eq!(sorensen_similarity(&[1, 0], &[0, 1]), 0.0);
    }

    #[test]
    fn test_both_zero_is_zero() {
        let s = sorensen_similarity(&[0, 0, 0], &[0, 0, 0]);
        assert_eq!(s, 0.0);
        assert!(!s.is_nan());
    }

    #[test]
    fn test_counts() {
        let c = SorensenCounts::tally(&[1, 1, 0, 1], &[1, 0, 1, 1]);
        assert_eq!(c, SorensenCounts { shared: 2, total: 6 });
    }

    #[test]
    fn test_condensed() {
        let vectors = vec![vec![1, 1, 0], vec![1, 0, 0], vec![0, 0, 1]];
        let s = sorensen_condensed(&vectors).unwrap();
        assert_eq!(s.len(), 3);
        assert_abs_diff_eq!(s[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(s[1], 0.0);
        assert_eq!(s[2], 0.0);
    }
}
