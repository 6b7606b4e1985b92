//! Bootstrap resampling of matrix columns.
//!
//! Rows (samples) are kept; the taxon-group columns are drawn with
//! replacement. Every replicate therefore has the same sample set and the same
//! pairwise layout as the original matrix.

use crate::error::{BetaError, Result};
use rand::Rng;

/// Draw `n_draws` column indices uniformly with replacement from `0..n_columns`.
pub fn draw_columns<R: Rng + ?Sized>(n_columns: usize, n_draws: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n_columns == 0 {
        return Err(BetaError::EmptyData(
            "Cannot resample a matrix without columns".to_string(),
        ));
    }
    Ok((0..n_draws).map(|_| rng.gen_range(0..n_columns)).collect())
}

/// Build new rows holding the given columns in order (repeats allowed).
pub fn select_columns(rows: &[Vec<f64>], columns: &[usize]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| columns.iter().map(|&c| row[c]).collect())
        .collect()
}

/// One bootstrap replicate of `rows` with `n_draws` resampled columns.
///
/// Repeated draws of the same column are independent positions in the
/// replicate; columns are labeled positionally.
pub fn resample_columns<R: Rng + ?Sized>(rows: &[Vec<f64>], n_draws: usize, rng: &mut R) -> Result<Vec<Vec<f64>>> {
    let n_columns = rows.first().map_or(0, Vec::len);
    let columns = draw_columns(n_columns, n_draws, rng)?;
    Ok(select_columns(rows, &columns))
}
