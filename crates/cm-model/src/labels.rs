//! Class label parsing and the default naming pattern.

use crate::error::{ModelError, Result};

/// Ordered class labels, one per class.
///
/// Index `i` names both row `i` (actual class) and column `i` (predicted class).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels(Vec<String>);

impl ClassLabels {
    /// Default labels `Class 1` .. `Class n`.
    #[must_use]
    pub fn defaults(count: usize) -> Self {
        Self((1..=count).map(default_label).collect())
    }

    /// Parse comma-separated label text.
    ///
    /// Tokens are trimmed and empty tokens are dropped, so `"A,, B ,"` yields
    /// `["A", "B"]`. The result may have any length; callers check it against
    /// the class count.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self(
            text.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Build labels from owned strings, trimming each one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyLabel`] if any label is blank.
    pub fn from_vec(labels: Vec<String>) -> Result<Self> {
        let mut trimmed = Vec::with_capacity(labels.len());
        for (index, label) in labels.into_iter().enumerate() {
            let label = label.trim();
            if label.is_empty() {
                return Err(ModelError::EmptyLabel { index });
            }
            trimmed.push(label.to_string());
        }
        Ok(Self(trimmed))
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Iterate over labels in class order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether these labels are exactly `Class 1` .. `Class n`.
    #[must_use]
    pub fn is_default_pattern(&self) -> bool {
        self.0
            .iter()
            .enumerate()
            .all(|(index, label)| *label == default_label(index + 1))
    }

    /// Comma-separated text form, as shown in the label input field.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0.join(", ")
    }
}

fn default_label(number: usize) -> String {
    format!("Class {number}")
}
