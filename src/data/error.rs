use std::path::PathBuf;

use thiserror::Error;

/// Why a telemetry file could not be turned into a table.
///
/// Every variant is fatal for the dashboard: nothing is shown except the
/// message.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing columns {missing:?}; found {found:?}")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("row {row}, column '{column}': '{value}' is not a finite number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: Time is not strictly increasing")]
    UnsortedTime { row: usize },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller errors when asking for statistics over a column by name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
}
