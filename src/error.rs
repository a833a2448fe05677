//! Error types for the oxide-normalize library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum NormError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported table format '{0}'")]
    UnsupportedFormat(String),

    #[error("Missing column '{0}' in table")]
    MissingColumn(String),

    #[error("Duplicate column '{0}' in table header")]
    DuplicateColumn(String),

    #[error("Dimension mismatch at row {row}: expected {expected} cells, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, NormError>;
