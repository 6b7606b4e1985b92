//! Group-by-and-sum aggregation.
//!
//! Counts of every row sharing a grouping key (e.g. taxonomic order) are
//! summed per sample column. Groups are emitted in sorted key order so the
//! resulting column layout is reproducible across runs.

use crate::data::{AbundanceMatrix, AbundanceTable};
use crate::error::{BetaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Grouping keys that carry no taxonomic meaning.
pub const DEFAULT_INVALID_GROUPS: &[&str] = &["unclassified", "unknown", "nan"];

/// How to aggregate a table into an abundance matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateConfig {
    /// Column holding the grouping key.
    pub group_column: String,
    /// Sample columns to aggregate, in output row order.
    pub sample_columns: Vec<String>,
    /// Drop rows whose key is listed in `invalid_groups`.
    pub exclude_invalid: bool,
    /// Keys treated as invalid (case-insensitive).
    pub invalid_groups: Vec<String>,
}

impl AggregateConfig {
    /// Aggregate `sample_columns` by `group_column`, keeping every group.
    pub fn new(group_column: &str, sample_columns: &[&str]) -> Self {
        Self {
            group_column: group_column.to_string(),
            sample_columns: sample_columns.iter().map(|s| s.to_string()).collect(),
            exclude_invalid: false,
            invalid_groups: DEFAULT_INVALID_GROUPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Drop groups such as "unclassified" or "unknown".
    pub fn excluding_invalid(mut self) -> Self {
        self.exclude_invalid = true;
        self
    }

    /// Replace the list of invalid keys.
    pub fn with_invalid_groups(mut self, groups: &[&str]) -> Self {
        self.invalid_groups = groups.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Check a key against a list of invalid keys (trimmed, case-insensitive).
pub fn is_invalid_group(key: &str, invalid_groups: &[String]) -> bool {
    let key = key.trim();
    invalid_groups.iter().any(|g| g.trim().eq_ignore_ascii_case(key))
}

/// Sum sample columns within each grouping key.
///
/// Rows with an empty key are always dropped, since they cannot be assigned
/// to a group. Empty numeric cells count as 0.
///
/// # Errors
///
/// Fails with [`BetaError::MissingColumn`] if the grouping column or any
/// sample column is absent, and with [`BetaError::InvalidCount`] for
/// non-numeric or negative cells.
pub fn aggregate_by_group(table: &AbundanceTable, config: &AggregateConfig) -> Result<AbundanceMatrix> {
    if config.sample_columns.is_empty() {
        return Err(BetaError::InvalidParameter(
            "At least one sample column is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for sample in &config.sample_columns {
        if !seen.insert(sample.as_str()) {
            return Err(BetaError::DuplicateLabel(sample.clone()));
        }
    }

    // Resolve every column before touching any data.
    let group_col = table.column_position(&config.group_column)?;
    let sample_cols: Vec<usize> = config
        .sample_columns
        .iter()
        .map(|name| table.column_position(name))
        .collect::<Result<_>>()?;

    let n_samples = sample_cols.len();
    let mut sums: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut n_blank = 0usize;
    let mut excluded: BTreeMap<String, usize> = BTreeMap::new();

    for row in 0..table.n_rows() {
        let key = table.cell(row, group_col).unwrap_or("").trim();
        if key.is_empty() {
            n_blank += 1;
            continue;
        }
        if config.exclude_invalid && is_invalid_group(key, &config.invalid_groups) {
            *excluded.entry(key.to_string()).or_default() += 1;
            continue;
        }

        let entry = sums
            .entry(key.to_string())
            .or_insert_with(|| vec![0.0; n_samples]);
        for (s, &col) in sample_cols.iter().enumerate() {
            let raw = table.cell(row, col).unwrap_or("");
            entry[s] += parse_count(raw, row, &config.sample_columns[s])?;
        }
    }

    if n_blank > 0 {
        log::warn!(
            "Dropped {} rows with an empty '{}' value",
            n_blank,
            config.group_column
        );
    }
    for (key, n) in &excluded {
        log::info!("Excluded {} rows with invalid group '{}'", n, key);
    }

    if sums.is_empty() {
        return Err(BetaError::EmptyData(format!(
            "No valid '{}' groups left after filtering",
            config.group_column
        )));
    }

    let group_ids: Vec<String> = sums.keys().cloned().collect();
    let rows: Vec<Vec<f64>> = (0..n_samples)
        .map(|s| sums.values().map(|v| v[s]).collect())
        .collect();

    log::debug!(
        "Aggregated {} rows into {} samples x {} groups",
        table.n_rows(),
        n_samples,
        group_ids.len()
    );

    AbundanceMatrix::from_rows(&rows, config.sample_columns.clone(), group_ids)
}

fn parse_count(raw: &str, row: usize, column: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let invalid = || BetaError::InvalidCount {
        value: raw.to_string(),
        row,
        column: column.to_string(),
    };
    let value: f64 = raw.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}
