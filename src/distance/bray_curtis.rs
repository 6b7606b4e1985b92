//! Bray-Curtis dissimilarity between abundance profiles.

use super::condensed::pdist;
use crate::error::Result;

/// Bray-Curtis dissimilarity between two non-negative profiles.
///
/// BC = Σ|a_i - b_i| / Σ(a_i + b_i), in [0, 1]. Two all-zero profiles have
/// distance 0. Both slices must have the same length.
pub fn bray_curtis(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut diff = 0.0;
    let mut total = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        diff += (x - y).abs();
        total += x + y;
    }
    if total > 0.0 {
        diff / total
    } else {
        0.0
    }
}

/// Condensed Bray-Curtis vector over the rows of `profiles`.
pub fn bray_curtis_condensed(profiles: &[Vec<f64>]) -> Result<Vec<f64>> {
    pdist(profiles, bray_curtis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identical_is_zero() {
        assert_eq!(bray_curtis(&[3.0, 4.0, 5.0], &[3.0, 4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_disjoint_is_one() {
        assert_eq!(bray_curtis(&[10.0, 0.0], &[0.0, 10.0]), 1.0);
    }

    #[test]
    fn test_known_value() {
        // |10-5| + |0-5| = 10, total = 20
        assert_abs_diff_eq!(bray_curtis(&[10.0, 0.0], &[5.0, 5.0]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_both_zero_is_zero() {
        let d = bray_curtis(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]);
        assert_eq!(d, 0.0);
        assert!(!d.is_nan());
    }

    #[test]
    fn test_one_zero_profile_is_one() {
        assert_eq!(bray_curtis(&[0.0, 0.0], &[1.0, 2.0]), 1.0);
    }

    #[test]
    fn test_condensed_scenario() {
        let profiles = vec![vec![10.0, 0.0], vec![5.0, 5.0], vec![0.0, 10.0]];
        let d = bray_curtis_condensed(&profiles).unwrap();
        assert_eq!(d.len(), 3);
        assert_abs_diff_eq!(d[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(d[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[2], 0.5, epsilon = 1e-12);
    }
}
