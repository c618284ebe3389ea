//! Square grid of confusion counts.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// What happens to existing counts when the class count changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Keep counts at indices present in both sizes, zero-fill the rest.
    #[default]
    Preserve,
    /// Start over with an all-zero grid.
    Discard,
}

/// Confusion counts indexed by (actual row, predicted column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionGrid {
    size: usize,
    cells: Vec<u64>,
}

impl ConfusionGrid {
    /// An all-zero `size × size` grid.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from rows, which must form a square.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MatrixRowLength`] if any row length differs from
    /// the number of rows.
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(ModelError::MatrixRowLength {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }
        Ok(Self { size, cells })
    }

    /// Number of classes (rows and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Count at (row, col), or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set the count at (row, col).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CellOutOfRange`] for an index outside the grid.
    pub fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        let idx = self.index(row, col).ok_or(ModelError::CellOutOfRange {
            row,
            col,
            size: self.size,
        })?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        // chunks(0) panics, and an empty grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    /// Row-major copy of all rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.rows().map(<[u64]>::to_vec).collect()
    }

    /// Smallest and largest count; `(0, 0)` for an empty grid.
    #[must_use]
    pub fn value_range(&self) -> (u64, u64) {
        let min = self.cells.iter().copied().min().unwrap_or(0);
        let max = self.cells.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// A copy resized to `size × size` under `policy`.
    #[must_use]
    pub fn resized(&self, size: usize, policy: ResizePolicy) -> Self {
        let mut next = Self::zeros(size);
        if policy == ResizePolicy::Preserve {
            let keep = self.size.min(size);
            for row in 0..keep {
                for col in 0..keep {
                    next.cells[row * size + col] = self.cells[row * self.size + col];
                }
            }
        }
        next
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then_some(row * self.size + col)
    }
}
