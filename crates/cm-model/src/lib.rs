//! Confusion matrix entry model.
//!
//! [`MatrixState`] owns the class count, the class labels and the square grid
//! of counts (rows are actual classes, columns are predicted classes). All
//! edits go through its methods, which keep the three consistent. Rendering
//! works from a [`MatrixSnapshot`], which can only be taken while labels and
//! class count agree.
//!
//! # Example
//!
//! ```
//! use cm_model::{MatrixState, ModelError};
//!
//! let mut state = MatrixState::new();
//! state.set_num_classes(2).unwrap();
//! state.set_labels_from_text("Cat, Dog").unwrap();
//! state.set_cell(0, 0, 5).unwrap();
//! state.set_cell(1, 1, 10).unwrap();
//!
//! let err = state.set_labels_from_text("Cat, Dog, Bird").unwrap_err();
//! assert!(matches!(err, ModelError::LabelCountMismatch { expected: 2, found: 3 }));
//!
//! let snapshot = state.snapshot().unwrap();
//! assert_eq!(snapshot.grid().get(1, 1), Some(10));
//! ```

mod error;
mod export;
mod grid;
mod input;
mod labels;
mod state;

pub use error::{ModelError, Result};
pub use export::{DEFAULT_FILE_NAME, Dpi, ExportConfig, ExportFormat};
pub use grid::{ConfusionGrid, ResizePolicy};
pub use input::{cell_value_from_i64, check_class_count, parse_cell_value, parse_class_count};
pub use labels::ClassLabels;
pub use state::{MatrixSnapshot, MatrixState};

/// Smallest supported number of classes.
pub const MIN_CLASSES: usize = 2;

/// Largest supported number of classes.
pub const MAX_CLASSES: usize = 20;

/// Class count of a fresh session.
pub const DEFAULT_CLASSES: usize = 4;
