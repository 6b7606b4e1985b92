//! Long-format abundance table as read from disk.
//!
//! Each row is one taxon (or MAG, OTU, ...) carrying a set of annotation
//! columns (e.g. `Order`, `Phylum`) and one numeric column per sample. The
//! table is kept as raw strings; numeric parsing happens during aggregation so
//! that only the columns an analysis actually uses have to be well-formed.

use crate::error::{BetaError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// A comma-separated abundance table with a header row.
#[derive(Debug, Clone)]
pub struct AbundanceTable {
    /// Column names in file order.
    columns: Vec<String>,
    /// Column name -> position.
    column_index: HashMap<String, usize>,
    /// Cell values, one inner vector per data row.
    rows: Vec<Vec<String>>,
}

impl AbundanceTable {
    /// Create a table from a header and rows of cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(BetaError::EmptyData("Table has no columns".to_string()));
        }

        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if column_index.insert(name.clone(), idx).is_some() {
                return Err(BetaError::DuplicateLabel(name.clone()));
            }
        }

        for row in &rows {
            if row.len() != columns.len() {
                return Err(BetaError::DimensionMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self {
            columns,
            column_index,
            rows,
        })
    }

    /// Load a table from a CSV file.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a table from any CSV source.
    ///
    /// Header names and cells are trimmed of surrounding whitespace.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Self::new(columns, rows)
    }

    /// Column names in file order.
    #[inline]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Position of a named column.
    ///
    /// Fails with [`BetaError::MissingColumn`] if the column is absent.
    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| BetaError::MissingColumn(name.to_string()))
    }

    /// Get a cell by row index and column position.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// Iterate over the values of a named column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let col = self.column_position(name)?;
        Ok(self.rows.iter().map(move |r| r[col].as_str()))
    }

    /// Distinct values of a column in first-seen order.
    pub fn distinct_values(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for value in self.column(name)? {
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "\
MAG,Order,M24,M25
mag1,Bacillales,10,0
mag2, Bacillales ,5,3
mag3,unknown,1,1
";

    #[test]
    fn test_from_reader() {
        let table = AbundanceTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.column_names(), &["MAG", "Order", "M24", "M25"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.cell(1, 1), Some("Bacillales"));
        assert_eq!(table.cell(0, 2), Some("10"));
    }

    #[test]
    fn test_from_csv_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", TABLE).unwrap();
        file.flush().unwrap();

        let table = AbundanceTable::from_csv(file.path()).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert!(table.has_column("M25"));
    }

    #[test]
    fn test_missing_column() {
        let table = AbundanceTable::from_reader(TABLE.as_bytes()).unwrap();
        let err = table.column_position("M42").unwrap_err();
        assert!(matches!(err, BetaError::MissingColumn(ref c) if c == "M42"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_distinct_values() {
        let table = AbundanceTable::from_reader(TABLE.as_bytes()).unwrap();
        let orders = table.distinct_values("Order").unwrap();
        assert_eq!(orders, vec!["Bacillales", "unknown"]);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let result = AbundanceTable::new(
            vec!["Order".to_string(), "M24".to_string(), "M24".to_string()],
            vec![],
        );
        assert!(matches!(result, Err(BetaError::DuplicateLabel(_))));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = AbundanceTable::from_reader("Order,M24\nA,1,2\n".as_bytes());
        assert!(result.is_err());
    }
}
