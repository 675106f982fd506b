//! Error types for the runlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for runlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed CSV input
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Parsed entries failed the structural check
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Malformed input rejected by the CSV parser.
///
/// Row numbers are 1-based and count the header as row 1.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("CSV file is empty or has no data rows")]
    Empty,

    #[error("Missing required columns: date, person, miles (or mi)")]
    MissingColumns,

    #[error("Row {row}: Column count mismatch")]
    ColumnCountMismatch { row: usize },

    #[error("Row {row}: Invalid date format \"{value}\"")]
    InvalidDate { row: usize, value: String },

    #[error("Row {row}: Invalid miles value \"{value}\"")]
    InvalidMiles { row: usize, value: String },

    #[error("Row {row}: Person name is required")]
    MissingPerson { row: usize },
}

impl FormatError {
    /// Row the error refers to, if it is row-scoped
    pub fn row(&self) -> Option<usize> {
        match self {
            FormatError::ColumnCountMismatch { row }
            | FormatError::InvalidDate { row, .. }
            | FormatError::InvalidMiles { row, .. }
            | FormatError::MissingPerson { row } => Some(*row),
            FormatError::Empty | FormatError::MissingColumns => None,
        }
    }
}

/// Structural violation found by [`crate::validate::validate`].
///
/// `row` is the 1-based position of the offending entry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No valid data rows found")]
    NoData,

    #[error("Invalid date in row {row}")]
    InvalidDate { row: usize },

    #[error("Invalid person name in row {row}")]
    InvalidPerson { row: usize },

    #[error("Invalid miles value in row {row}")]
    InvalidMiles { row: usize },
}
