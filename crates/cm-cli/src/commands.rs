//! Command implementations shared by the binary and its tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use cm_model::{Dpi, ExportConfig, ExportFormat, MatrixState};
use cm_render::{RenderExporter, canvas_size};

use crate::preview::preview_table;
use crate::session::Session;

/// Command-line values that take precedence over a session's `[export]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOverrides {
    pub format: Option<ExportFormat>,
    pub dpi: Option<Dpi>,
    pub file_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub font: Option<PathBuf>,
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub mime_type: &'static str,
    pub bytes: usize,
    /// Pixel size for raster formats.
    pub pixels: Option<(u32, u32)>,
}

impl ExportOutcome {
    /// One-line summary for the terminal.
    #[must_use]
    pub fn summary(&self) -> String {
        let size = match self.pixels {
            Some((width, height)) => format!(", {width}x{height} px"),
            None => String::new(),
        };
        format!(
            "Wrote {} ({}, {} bytes{size})",
            self.path.display(),
            self.mime_type,
            self.bytes
        )
    }
}

/// Load a session and check it describes a consistent matrix.
pub fn load_state(session_path: &Path) -> Result<(Session, MatrixState)> {
    let session = Session::load(session_path)?;
    let state = session
        .to_state()
        .with_context(|| format!("invalid session {}", session_path.display()))?;
    Ok((session, state))
}

/// Render the session and write `{file_name}.{ext}`.
///
/// The file is written only once encoding has succeeded.
pub fn run_export(session_path: &Path, overrides: &ExportOverrides) -> Result<ExportOutcome> {
    let span = info_span!("session", path = %session_path.display());
    let _guard = span.enter();

    let (session, state) = load_state(session_path)?;
    let config = resolve_config(&session, overrides)?;
    let snapshot = state.snapshot()?;

    let exporter = match &overrides.font {
        Some(path) => RenderExporter::with_font_file(path)
            .with_context(|| format!("load font {}", path.display()))?,
        None => RenderExporter::new().context("load embedded font")?,
    };
    let rendered = exporter
        .export(&snapshot, &config)
        .with_context(|| format!("render {}", config.format()))?;

    let output_dir = overrides.output_dir.clone().unwrap_or_else(|| {
        session_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    if !output_dir.as_os_str().is_empty() {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;
    }
    let path = output_dir.join(&rendered.file_name);
    fs::write(&path, &rendered.bytes).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), bytes = rendered.bytes.len(), "export written");

    Ok(ExportOutcome {
        pixels: config
            .format()
            .is_raster()
            .then(|| canvas_size(config.dpi().value())),
        path,
        format: rendered.format,
        mime_type: rendered.mime_type,
        bytes: rendered.bytes.len(),
    })
}

/// Session export settings with command-line overrides applied.
pub fn resolve_config(session: &Session, overrides: &ExportOverrides) -> Result<ExportConfig> {
    let base = session.export_config().context("invalid [export] settings")?;
    let config = ExportConfig::new(
        overrides.format.unwrap_or(base.format()),
        overrides.dpi.unwrap_or(base.dpi()),
        overrides
            .file_name
            .clone()
            .unwrap_or_else(|| base.file_name().to_string()),
    )
    .context("invalid export settings")?;
    debug!(format = %config.format(), dpi = config.dpi().value(), "resolved export settings");
    Ok(config)
}

/// The session's entry grid as a printable table.
pub fn run_preview(session_path: &Path) -> Result<String> {
    let (_, state) = load_state(session_path)?;
    Ok(preview_table(&state).to_string())
}

/// A starter session, written to `output` or returned for printing.
pub fn run_template(classes: usize, output: Option<&Path>) -> Result<Option<String>> {
    let text = Session::template(classes)?.to_toml()?;
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            Ok(None)
        }
        None => Ok(Some(text)),
    }
}
