//! Error types for rendering and encoding.

use cm_model::ExportFormat;
use thiserror::Error;

/// Errors that can occur while drawing or encoding a heatmap.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster encoder rejected the canvas.
    #[error("failed to encode {format} image")]
    Encode {
        format: ExportFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Building or serialising the PDF document failed.
    #[error("failed to write PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Font data could not be parsed.
    #[error("invalid font: {message}")]
    Font { message: String },

    /// I/O error while loading a font file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn encode(
        format: ExportFormat,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Encode {
            format,
            source: Box::new(source),
        }
    }
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
