//! Percentiles with linear interpolation (R type 7, numpy's default).

/// Percentile of already sorted data at probability `q` in [0, 1].
///
/// Returns `None` for empty input. A constant input returns that constant.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    if n == 1 {
        return Some(sorted[0]);
    }

    let h = (n - 1) as f64 * q;
    let lo = h.floor() as usize;
    if lo >= n - 1 {
        return Some(sorted[n - 1]);
    }
    let frac = h - lo as f64;
    let (a, b) = (sorted[lo], sorted[lo + 1]);
    if frac == 0.0 || a == b {
        return Some(a);
    }
    Some(a + frac * (b - a))
}

/// Sort a copy of `values` and take the percentile at `q`.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, q)
}

/// Mean plus a two-sided interval of one ensemble position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Summarise `values` (reordered in place) at quantiles `lower_q` and `upper_q`.
///
/// Bounds are the plain percentiles. A heavy tail can leave the mean
/// outside them, so `lower <= mean <= upper` is not guaranteed.
pub fn summarize(values: &mut [f64], lower_q: f64, upper_q: f64) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let min = values[0];
    let max = values[values.len() - 1];
    // Rounding in the sum must not push the mean outside the observed range.
    let mean = (values.iter().sum::<f64>() / values.len() as f64).clamp(min, max);
    Some(Summary {
        mean,
        lower: percentile_sorted(values, lower_q)?,
        upper: percentile_sorted(values, upper_q)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_matches_linear_interpolation() {
        // numpy.percentile([1, 2, 3, 4], [2.5, 50, 97.5]) = [1.075, 2.5, 3.925]
        let data = [4.0, 1.0, 3.0, 2.0];
        assert_abs_diff_eq!(percentile(&data, 0.025).unwrap(), 1.075, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&data, 0.5).unwrap(), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(percentile(&data, 0.975).unwrap(), 3.925, epsilon = 1e-12);
    }

    #[test]
    fn test_extremes() {
        let data = [0.2, 0.9, 0.5];
        assert_eq!(percentile(&data, 0.0), Some(0.2));
        assert_eq!(percentile(&data, 1.0), Some(0.9));
    }

    #[test]
    fn test_constant_input() {
        let data = vec![0.1; 1000];
        assert_eq!(percentile(&data, 0.025), Some(0.1));
        assert_eq!(percentile(&data, 0.975), Some(0.1));

        let mut values = data.clone();
        let s = summarize(&mut values, 0.025, 0.975).unwrap();
        assert_eq!(s.lower, 0.1);
        assert_eq!(s.upper, 0.1);
        assert!(s.lower <= s.mean && s.mean <= s.upper);
    }

    #[test]
    fn test_bounds_are_raw_percentiles_under_heavy_tail() {
        // 2% of mass at 0 pulls the mean below the 2.5th percentile.
        let values: Vec<f64> = (0..1000).map(|i| if i < 20 { 0.0 } else { 0.8 }).collect();
        let s = summarize(&mut values.clone(), 0.025, 0.975).unwrap();
        assert_abs_diff_eq!(s.mean, 0.784, epsilon = 1e-12);
        assert_eq!(s.lower, 0.8);
        assert_eq!(Some(s.lower), percentile(&values, 0.025));
        assert_eq!(Some(s.upper), percentile(&values, 0.975));
        assert!(s.mean < s.lower);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[3.0], 0.975), Some(3.0));
        assert!(summarize(&mut [], 0.025, 0.975).is_none());
    }
}
