//! Error types for the composable-beta library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum BetaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid count value '{value}' at row {row}, column '{column}'")]
    InvalidCount {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(
        "Shape mismatch in bootstrap replicate {replicate}: expected {expected} pairwise distances, got {actual}"
    )]
    ShapeMismatch {
        replicate: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Missing column '{0}' in input table")]
    MissingColumn(String),

    #[error("Duplicate label '{0}'")]
    DuplicateLabel(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: String,
        #[source]
        source: Box<BetaError>,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BetaError {
    /// Whether the error stems from how the analysis was configured rather than
    /// from the data or the environment.
    pub fn is_configuration(&self) -> bool {
        match self {
            BetaError::MissingColumn(_) | BetaError::InvalidParameter(_) | BetaError::DuplicateLabel(_) => true,
            BetaError::Phase { source, .. } => source.is_configuration(),
            _ => false,
        }
    }

    /// Wrap an error with the name of the analysis phase it occurred in.
    pub fn in_phase(self, phase: &str) -> Self {
        BetaError::Phase {
            phase: phase.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, BetaError>;
