//! The single owned editing state and its immutable snapshots.

use tracing::debug;

use crate::error::{ModelError, Result};
use crate::grid::{ConfusionGrid, ResizePolicy};
use crate::input::check_class_count;
use crate::labels::ClassLabels;
use crate::DEFAULT_CLASSES;

/// Class count, labels and counts for one editing session.
///
/// Every edit goes through a method here. The grid is always
/// `num_classes × num_classes`; labels may temporarily disagree with the
/// class count after a resize with custom labels, and while they do the
/// state refuses cell edits and snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixState {
    num_classes: usize,
    labels: ClassLabels,
    grid: ConfusionGrid,
    policy: ResizePolicy,
}

impl MatrixState {
    /// Default state: 4 classes named `Class 1`..`Class 4`, all counts zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ResizePolicy::default())
    }

    /// Default state with an explicit resize policy.
    #[must_use]
    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self {
            num_classes: DEFAULT_CLASSES,
            labels: ClassLabels::defaults(DEFAULT_CLASSES),
            grid: ConfusionGrid::zeros(DEFAULT_CLASSES),
            policy,
        }
    }

    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[must_use]
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Label text as shown in the comma-separated input field.
    #[must_use]
    pub fn labels_text(&self) -> String {
        self.labels.to_text()
    }

    #[must_use]
    pub fn grid(&self) -> &ConfusionGrid {
        &self.grid
    }

    #[must_use]
    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Count at (row, col).
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<u64> {
        self.grid.get(row, col)
    }

    /// Whether labels still follow the `Class i` pattern.
    #[must_use]
    pub fn has_default_labels(&self) -> bool {
        self.labels.is_default_pattern()
    }

    /// The pending label mismatch, if labels and class count disagree.
    #[must_use]
    pub fn label_mismatch(&self) -> Option<ModelError> {
        (self.labels.len() != self.num_classes).then(|| ModelError::LabelCountMismatch {
            expected: self.num_classes,
            found: self.labels.len(),
        })
    }

    /// Change the number of classes.
    ///
    /// Default labels are regenerated for the new count; custom labels are
    /// kept as they are. The grid is rebuilt under the resize policy.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ClassCountOutOfRange`] outside `2..=20`; the
    /// state is left unchanged.
    pub fn set_num_classes(&mut self, n: usize) -> Result<()> {
        let n = check_class_count(n)?;
        if n == self.num_classes {
            return Ok(());
        }
        if self.labels.is_default_pattern() {
            self.labels = ClassLabels::defaults(n);
        }
        self.grid = self.grid.resized(n, self.policy);
        debug!(
            from = self.num_classes,
            to = n,
            policy = ?self.policy,
            default_labels = self.labels.is_default_pattern(),
            "class count changed"
        );
        self.num_classes = n;
        Ok(())
    }

    /// Replace labels from comma-separated text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LabelCountMismatch`] when the parsed label count
    /// differs from the class count; prior labels are kept.
    pub fn set_labels_from_text(&mut self, text: &str) -> Result<()> {
        let labels = ClassLabels::parse(text);
        if labels.len() != self.num_classes {
            return Err(ModelError::LabelCountMismatch {
                expected: self.num_classes,
                found: labels.len(),
            });
        }
        self.labels = labels;
        Ok(())
    }

    /// Set one count.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LabelCountMismatch`] while labels disagree with
    /// the class count, or [`ModelError::CellOutOfRange`] for a bad index.
    pub fn set_cell(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        self.ensure_consistent()?;
        self.grid.set(row, col, value)
    }

    /// Replace every count from rows of the current size.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LabelCountMismatch`] while mismatched, or a
    /// matrix shape error when `rows` is not `num_classes × num_classes`.
    pub fn set_rows(&mut self, rows: &[Vec<u64>]) -> Result<()> {
        self.ensure_consistent()?;
        if rows.len() != self.num_classes {
            return Err(ModelError::MatrixRowCount {
                expected: self.num_classes,
                found: rows.len(),
            });
        }
        self.grid = ConfusionGrid::from_rows(rows)?;
        Ok(())
    }

    /// Immutable copy of labels and counts for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LabelCountMismatch`] while mismatched.
    pub fn snapshot(&self) -> Result<MatrixSnapshot> {
        self.ensure_consistent()?;
        MatrixSnapshot::new(self.labels.clone(), self.grid.clone())
    }

    fn ensure_consistent(&self) -> Result<()> {
        match self.label_mismatch() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MatrixState {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent, read-only view of labels and counts.
///
/// Only constructible with at least two classes and one non-empty label per
/// class, so the renderer can rely on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixSnapshot {
    labels: ClassLabels,
    grid: ConfusionGrid,
}

impl MatrixSnapshot {
    /// Build a snapshot directly from labels and a grid.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LabelCountMismatch`] when sizes disagree,
    /// [`ModelError::ClassCountOutOfRange`] for fewer than two or more than
    /// twenty classes, or [`ModelError::EmptyLabel`] for a blank label.
    pub fn new(labels: ClassLabels, grid: ConfusionGrid) -> Result<Self> {
        if labels.len() != grid.size() {
            return Err(ModelError::LabelCountMismatch {
                expected: grid.size(),
                found: labels.len(),
            });
        }
        check_class_count(grid.size())?;
        if let Some(index) = labels.iter().position(|label| label.trim().is_empty()) {
            return Err(ModelError::EmptyLabel { index });
        }
        Ok(Self { labels, grid })
    }

    #[must_use]
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    #[must_use]
    pub fn grid(&self) -> &ConfusionGrid {
        &self.grid
    }

    /// Number of classes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }
}
