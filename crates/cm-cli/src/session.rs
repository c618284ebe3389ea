//! TOML session files: the entry form's fields saved to disk.
//!
//! ```toml
//! classes = 2
//! labels = "Cat, Dog"
//! matrix = [[5, 0], [2, 10]]
//!
//! [export]
//! format = "png"
//! dpi = 300
//! file_name = "Confusion_Matrix"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use cm_model::{
    DEFAULT_CLASSES, DEFAULT_FILE_NAME, Dpi, ExportConfig, ExportFormat, MatrixState, ModelError,
    ResizePolicy, cell_value_from_i64,
};

/// A saved matrix entry session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    /// Number of classes (defaults to 4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<usize>,
    /// Comma-separated class names (defaults to `Class 1..n`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Counts, one row per actual class (defaults to zeros).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<i64>>>,
    /// How counts carry over when `classes` differs from the matrix size
    /// (defaults to `preserve`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizePolicy>,
    #[serde(default)]
    pub export: ExportSection,
}

/// The `[export]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<Dpi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Session {
    /// Read and parse a session file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read session {}", path.display()))?;
        let session = Self::parse(&text).with_context(|| format!("parse session {}", path.display()))?;
        debug!(path = %path.display(), classes = ?session.classes, "loaded session");
        Ok(session)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// A fresh session for `classes` classes with default labels and zero counts.
    pub fn template(classes: usize) -> std::result::Result<Self, ModelError> {
        let mut state = MatrixState::new();
        state.set_num_classes(classes)?;
        let defaults = ExportConfig::default();
        Ok(Self {
            classes: Some(classes),
            labels: Some(state.labels_text()),
            matrix: Some(
                state
                    .grid()
                    .to_rows()
                    .into_iter()
                    .map(|row| row.into_iter().map(|v| v as i64).collect())
                    .collect(),
            ),
            resize: None,
            export: ExportSection {
                format: Some(defaults.format()),
                dpi: Some(defaults.dpi()),
                file_name: Some(defaults.file_name().to_string()),
            },
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replay the session's fields into a [`MatrixState`].
    ///
    /// Counts are loaded at the size they were entered in. When `classes`
    /// names a different size the grid is then resized under the `resize`
    /// policy, and labels are applied last against the final class count.
    pub fn to_state(&self) -> std::result::Result<MatrixState, ModelError> {
        let mut state = MatrixState::with_policy(self.resize.unwrap_or_default());
        if let Some(matrix) = &self.matrix {
            let rows = matrix
                .iter()
                .map(|row| row.iter().copied().map(cell_value_from_i64).collect())
                .collect::<std::result::Result<Vec<Vec<u64>>, _>>()?;
            state.set_num_classes(rows.len())?;
            state.set_rows(&rows)?;
        }
        let classes = self
            .classes
            .or_else(|| self.matrix.as_ref().map(Vec::len))
            .unwrap_or(DEFAULT_CLASSES);
        state.set_num_classes(classes)?;
        if let Some(text) = &self.labels {
            state.set_labels_from_text(text)?;
        }
        Ok(state)
    }

    /// Export settings with the session's values filling in defaults.
    pub fn export_config(&self) -> std::result::Result<ExportConfig, ModelError> {
        ExportConfig::new(
            self.export.format.unwrap_or_default(),
            self.export.dpi.unwrap_or_default(),
            self.export
                .file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_session_loads_into_state() {
        let session = Session::parse(
            r#"
classes = 2
labels = "Cat, Dog"
matrix = [[5, 0], [2, 10]]

[export]
format = "pdf"
dpi = 600
file_name = "pets"
"#,
        )
        .unwrap();
        let state = session.to_state().unwrap();
        assert_eq!(state.labels().as_slice(), ["Cat", "Dog"]);
        assert_eq!(state.cell(1, 1), Some(10));

        let config = session.export_config().unwrap();
        assert_eq!(config.format(), ExportFormat::Pdf);
        assert_eq!(config.dpi(), Dpi::Dpi600);
        assert_eq!(config.file_name_with_extension(), "pets.pdf");
    }

    #[test]
    fn empty_session_is_the_default_form() {
        let session = Session::parse("").unwrap();
        let state = session.to_state().unwrap();
        assert_eq!(state.num_classes(), 4);
        assert!(state.has_default_labels());
        assert_eq!(state.grid().total(), 0);
        assert_eq!(
            session.export_config().unwrap().file_name_with_extension(),
            "Confusion_Matrix.png"
        );
    }

    #[test]
    fn negative_count_is_invalid() {
        let session = Session::parse("classes = 2\nmatrix = [[1, -3], [0, 0]]").unwrap();
        assert!(matches!(
            session.to_state(),
            Err(ModelError::InvalidCellValue { .. })
        ));
    }

    #[test]
    fn label_count_must_match() {
        let session = Session::parse("classes = 3\nlabels = \"A, B\"").unwrap();
        assert_eq!(
            session.to_state(),
            Err(ModelError::LabelCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn resize_policy_applies_when_classes_differ_from_matrix() {
        let session_with = |policy: &str| {
            Session::parse(&format!(
                "classes = 3\nmatrix = [[1, 2], [3, 4]]\nresize = \"{policy}\""
            ))
            .unwrap()
            .to_state()
            .unwrap()
        };
        let preserved = session_with("preserve");
        let discarded = session_with("discard");

        assert_eq!(
            preserved.grid().to_rows(),
            vec![vec![1, 2, 0], vec![3, 4, 0], vec![0, 0, 0]]
        );
        assert_eq!(discarded.grid().to_rows(), vec![vec![0; 3]; 3]);
        assert_ne!(preserved.grid(), discarded.grid());
        assert_eq!(preserved.num_classes(), 3);
        assert!(preserved.has_default_labels());
    }

    #[test]
    fn shrinking_keeps_the_top_left_block() {
        let session = Session::parse(
            "classes = 2\nlabels = \"A, B\"\nmatrix = [[1, 2, 3], [4, 5, 6], [7, 8, 9]]",
        )
        .unwrap();
        let state = session.to_state().unwrap();
        assert_eq!(state.grid().to_rows(), vec![vec![1, 2], vec![4, 5]]);
        assert_eq!(state.labels().as_slice(), ["A", "B"]);
    }

    #[test]
    fn matrix_size_sets_the_class_count_when_omitted() {
        let session = Session::parse("matrix = [[1, 0, 0], [0, 1, 0], [0, 0, 1]]").unwrap();
        let state = session.to_state().unwrap();
        assert_eq!(state.num_classes(), 3);
        assert_eq!(state.grid().total(), 3);
    }

    #[test]
    fn unknown_dpi_fails_to_parse() {
        let err = Session::parse("[export]\ndpi = 150").unwrap_err();
        assert!(format!("{err:#}").contains("150"));
    }

    #[test]
    fn template_round_trips() {
        let template = Session::template(3).unwrap();
        let text = template.to_toml().unwrap();
        assert_eq!(Session::parse(&text).unwrap(), template);
        assert!(text.contains("Class 1, Class 2, Class 3"));
    }
}
