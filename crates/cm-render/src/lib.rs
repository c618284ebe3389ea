//! Annotated confusion matrix heatmaps.
//!
//! [`RenderExporter`] turns a [`cm_model::MatrixSnapshot`] into PNG, JPEG or
//! PDF bytes. A figure is 7 × 6 inches; raster output is that size multiplied
//! by the chosen DPI. The heatmap uses a light-to-dark blue scale, every cell
//! is annotated with its count, and a colour bar sits to the right.
//!
//! Rendering goes through a backend-independent [`Scene`] produced by
//! [`layout`], which both the raster and the PDF backend draw.

mod color;
mod encode;
mod error;
mod exporter;
mod font;
mod layout;
mod metrics;
mod pdf;
mod raster;
mod scene;
mod ticks;

pub use color::{Colormap, Normalize, Rgb};
pub use encode::{encode_jpeg, encode_png};
pub use error::{RenderError, Result};
pub use exporter::{RenderExporter, RenderedImage};
pub use font::{GlyphFont, TextMask};
pub use layout::{
    FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN, POINTS_PER_INCH, TITLE, X_AXIS_TITLE, Y_AXIS_TITLE,
    canvas_size, layout,
};
pub use metrics::{HelveticaMetrics, TextMetrics};
pub use pdf::write_pdf;
pub use raster::rasterize;
pub use scene::{
    CellGeometry, Element, HAlign, Rect, Scene, TextItem, TextPlacement, TextRole, VAlign,
};
pub use ticks::{MAX_INTERVALS, colorbar_span, integer_ticks};
