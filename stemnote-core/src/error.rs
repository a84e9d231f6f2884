//! Error types for stemnote-core.

use thiserror::Error;

/// Result type alias for stemnote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for stemnote operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Dataset does not have the expected shape.
    #[error("invalid dataset shape: {0}")]
    InvalidShape(String),

    /// Scan index outside the scan grid.
    #[error("scan index ({col}, {row}) outside {cols}x{rows} grid")]
    IndexOutOfRange {
        col: usize,
        row: usize,
        cols: usize,
        rows: usize,
    },

    /// Scan region is empty or exceeds the scan grid.
    #[error("invalid scan region [{x1}, {x2}) x [{y1}, {y2})")]
    InvalidRegion {
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// An operation needed a loaded dataset.
    #[error("no dataset loaded")]
    NoDataset,
}
