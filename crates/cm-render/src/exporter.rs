//! One-shot export of a matrix snapshot to image bytes.

use std::path::Path;

use cm_model::{Dpi, ExportConfig, ExportFormat, MatrixSnapshot};
use image::RgbImage;
use tracing::{debug, info_span};

use crate::encode::{encode_jpeg, encode_png};
use crate::error::Result;
use crate::font::GlyphFont;
use crate::layout::layout;
use crate::metrics::HelveticaMetrics;
use crate::pdf::write_pdf;
use crate::raster::rasterize;
use crate::scene::Scene;

/// Encoded figure ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// `{file_name}.{extension}`.
    pub file_name: String,
    pub format: ExportFormat,
}

/// Renders confusion matrix heatmaps as PNG, JPEG or PDF.
///
/// The exporter only holds the font used for raster text. Canvases, glyph
/// caches and PDF documents live for the duration of one call.
#[derive(Debug, Clone)]
pub struct RenderExporter {
    font: GlyphFont,
}

impl RenderExporter {
    /// Exporter using the embedded sans-serif font.
    pub fn new() -> Result<Self> {
        Ok(Self::with_font(GlyphFont::embedded()?))
    }

    #[must_use]
    pub fn with_font(font: GlyphFont) -> Self {
        Self { font }
    }

    /// Exporter drawing raster text with the font file at `path`.
    pub fn with_font_file(path: &Path) -> Result<Self> {
        Ok(Self::with_font(GlyphFont::from_file(path)?))
    }

    #[must_use]
    pub fn font(&self) -> &GlyphFont {
        &self.font
    }

    /// Lay out the figure as it will be drawn for `format`.
    ///
    /// Raster formats are measured with the exporter's font, PDF with the
    /// Helvetica metrics of the text it embeds.
    #[must_use]
    pub fn scene(&self, snapshot: &MatrixSnapshot, format: ExportFormat) -> Scene {
        if format.is_raster() {
            layout(snapshot, &self.font)
        } else {
            layout(snapshot, &HelveticaMetrics)
        }
    }

    /// Draw the figure to pixels without encoding it.
    #[must_use]
    pub fn render_raster(&self, snapshot: &MatrixSnapshot, dpi: Dpi) -> RgbImage {
        let scene = layout(snapshot, &self.font);
        rasterize(&scene, &self.font, dpi.value())
    }

    /// Encode the figure in `format` at `dpi`.
    pub fn render(&self, snapshot: &MatrixSnapshot, format: ExportFormat, dpi: Dpi) -> Result<Vec<u8>> {
        let dpi = dpi.value();
        let scene = self.scene(snapshot, format);
        match format {
            ExportFormat::Png => encode_png(&rasterize(&scene, &self.font, dpi), dpi),
            ExportFormat::Jpg => encode_jpeg(&rasterize(&scene, &self.font, dpi), dpi),
            ExportFormat::Pdf => write_pdf(&scene, dpi),
        }
    }

    /// Render and encode `snapshot` according to `config`.
    pub fn export(&self, snapshot: &MatrixSnapshot, config: &ExportConfig) -> Result<RenderedImage> {
        let format = config.format();
        let span = info_span!(
            "export",
            format = %format,
            dpi = config.dpi().value(),
            classes = snapshot.size()
        );
        let _guard = span.enter();

        let bytes = self.render(snapshot, format, config.dpi())?;
        debug!(bytes = bytes.len(), "encoded figure");
        Ok(RenderedImage {
            bytes,
            mime_type: format.mime_type(),
            file_name: config.file_name_with_extension(),
            format,
        })
    }
}
