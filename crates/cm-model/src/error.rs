//! Error types for matrix entry and export settings.

use thiserror::Error;

/// Errors raised while editing a confusion matrix or choosing export settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The number of class labels does not match the class count.
    #[error("Number of class names must match number of classes (expected {expected}, found {found})")]
    LabelCountMismatch { expected: usize, found: usize },

    /// A label is empty after trimming whitespace.
    #[error("class label {index} is empty")]
    EmptyLabel { index: usize },

    /// Requested class count is outside the supported range.
    #[error("number of classes must be between {min} and {max}, got {requested}", min = crate::MIN_CLASSES, max = crate::MAX_CLASSES)]
    ClassCountOutOfRange { requested: usize },

    /// Cell input is negative or not an integer.
    #[error("invalid cell value '{input}': expected a non-negative integer")]
    InvalidCellValue { input: String },

    /// Cell index outside the grid.
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    CellOutOfRange { row: usize, col: usize, size: usize },

    /// Bulk matrix input has the wrong number of rows.
    #[error("matrix must have {expected} rows, found {found}")]
    MatrixRowCount { expected: usize, found: usize },

    /// A row of bulk matrix input has the wrong number of values.
    #[error("matrix row {row} must have {expected} values, found {found}")]
    MatrixRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// DPI outside the closed set of export resolutions.
    #[error("unsupported DPI {0}: choose 300 or 600")]
    UnsupportedDpi(u32),

    /// Unknown export format name.
    #[error("unsupported export format '{0}': choose PNG, JPG or PDF")]
    UnsupportedFormat(String),

    /// Output file name is empty.
    #[error("file name must not be empty")]
    EmptyFileName,
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
