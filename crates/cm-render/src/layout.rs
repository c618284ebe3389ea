//! Figure geometry: heatmap, ticks, labels, titles and colour bar.
//!
//! Margins start from measured text extents, then grow until every text
//! bounding box sits inside the figure. Cells are always square.

use cm_model::MatrixSnapshot;
use tracing::{debug, warn};

use crate::color::{Colormap, Normalize, Rgb};
use crate::metrics::TextMetrics;
use crate::scene::{CellGeometry, Element, HAlign, Rect, Scene, TextItem, TextRole, VAlign};
use crate::ticks::{colorbar_span, integer_ticks};

/// Figure width in inches.
pub const FIGURE_WIDTH_IN: u32 = 7;
/// Figure height in inches.
pub const FIGURE_HEIGHT_IN: u32 = 6;
/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

pub const TITLE: &str = "Confusion Matrix";
pub const X_AXIS_TITLE: &str = "Predicted";
pub const Y_AXIS_TITLE: &str = "Actual";

const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 12.0;
const MIN_ANNOTATION_SIZE: f32 = 4.0;
const EDGE_PAD: f32 = 1.08 * FONT_SIZE;
const TICK_LENGTH: f32 = 3.5;
const TICK_PAD: f32 = 3.5;
const LABEL_PAD: f32 = 4.0;
const TITLE_PAD: f32 = 6.0;
const LINE_WIDTH: f32 = 0.8;
const COLORBAR_WIDTH: f32 = 14.0;
const COLORBAR_GAP: f32 = 12.0;
const X_TICK_ROTATION: f32 = 45.0;
const MAX_LABEL_FRACTION: f32 = 0.3;
const MIN_AXES_SIDE: f32 = 36.0;
const MAX_PASSES: usize = 12;
const ELLIPSIS: char = '\u{2026}';

/// Pixel size of the canvas at `dpi`.
#[must_use]
pub fn canvas_size(dpi: u32) -> (u32, u32) {
    (FIGURE_WIDTH_IN * dpi, FIGURE_HEIGHT_IN * dpi)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Margins {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

/// Lay out the annotated heatmap for `snapshot`, measuring text with `metrics`.
#[must_use]
pub fn layout(snapshot: &MatrixSnapshot, metrics: &dyn TextMetrics) -> Scene {
    let width = FIGURE_WIDTH_IN as f32 * POINTS_PER_INCH;
    let height = FIGURE_HEIGHT_IN as f32 * POINTS_PER_INCH;
    let frame = Rect::new(0.0, 0.0, width, height);

    let max_label_width = width * MAX_LABEL_FRACTION;
    let labels: Vec<String> = snapshot
        .labels()
        .iter()
        .map(|label| fit_text(label, max_label_width, FONT_SIZE, metrics))
        .collect();
    let (lo, hi) = colorbar_span(snapshot.grid().value_range());
    let bar_ticks = integer_ticks(lo, hi);

    let mut margins = initial_margins(&labels, &bar_ticks, metrics);
    let mut scene = build(snapshot, &labels, &bar_ticks, (lo, hi), margins, metrics);
    for pass in 1..=MAX_PASSES {
        let content = text_extent(&scene, metrics);
        let Some(grown) = grow_margins(margins, &content, &frame) else {
            debug!(
                passes = pass,
                axes_side = scene.axes.width,
                classes = snapshot.size(),
                "layout settled"
            );
            return scene;
        };
        margins = grown;
        scene = build(snapshot, &labels, &bar_ticks, (lo, hi), margins, metrics);
    }
    warn!(classes = snapshot.size(), "layout did not settle; text may touch the edge");
    scene
}

fn initial_margins(labels: &[String], bar_ticks: &[u64], metrics: &dyn TextMetrics) -> Margins {
    let line = metrics.line_height(FONT_SIZE);
    let y_label_width = labels
        .iter()
        .map(|label| metrics.text_width(label, FONT_SIZE))
        .fold(0.0, f32::max);
    let x_label_drop = labels
        .iter()
        .map(|label| {
            x_tick_label(label, 0, (0.0, 0.0))
                .placement(metrics)
                .bounds
                .height
        })
        .fold(0.0, f32::max);
    let bar_label_width = bar_ticks
        .iter()
        .map(|tick| metrics.text_width(&tick.to_string(), FONT_SIZE))
        .fold(0.0, f32::max);

    Margins {
        left: EDGE_PAD + line + LABEL_PAD + y_label_width + TICK_PAD + TICK_LENGTH,
        right: EDGE_PAD
            + bar_label_width
            + TICK_PAD
            + TICK_LENGTH
            + COLORBAR_WIDTH
            + COLORBAR_GAP,
        top: EDGE_PAD + metrics.line_height(TITLE_SIZE) + TITLE_PAD,
        bottom: EDGE_PAD + line + LABEL_PAD + x_label_drop + TICK_PAD + TICK_LENGTH,
    }
}

/// Margins enlarged by however far `content` sticks out of the padded frame,
/// or `None` when it already fits.
fn grow_margins(margins: Margins, content: &Rect, frame: &Rect) -> Option<Margins> {
    let inner = Rect::new(
        frame.x + EDGE_PAD / 2.0,
        frame.y + EDGE_PAD / 2.0,
        frame.width - EDGE_PAD,
        frame.height - EDGE_PAD,
    );
    if inner.contains_rect(content, 0.0) {
        return None;
    }
    let nudge = |overflow: f32| if overflow > 0.0 { overflow + 0.5 } else { 0.0 };
    Some(Margins {
        left: margins.left + nudge(inner.x - content.x),
        right: margins.right + nudge(content.right() - inner.right()),
        top: margins.top + nudge(inner.y - content.y),
        bottom: margins.bottom + nudge(content.bottom() - inner.bottom()),
    })
}

fn text_extent(scene: &Scene, metrics: &dyn TextMetrics) -> Rect {
    scene
        .texts()
        .map(|text| text.placement(metrics).bounds)
        .fold(scene.axes.union(&scene.colorbar), |acc, bounds| {
            acc.union(&bounds)
        })
}

fn build(
    snapshot: &MatrixSnapshot,
    labels: &[String],
    bar_ticks: &[u64],
    (lo, hi): (u64, u64),
    margins: Margins,
    metrics: &dyn TextMetrics,
) -> Scene {
    let width = FIGURE_WIDTH_IN as f32 * POINTS_PER_INCH;
    let height = FIGURE_HEIGHT_IN as f32 * POINTS_PER_INCH;
    let n = snapshot.size();
    let grid = snapshot.grid();

    let avail_w = (width - margins.left - margins.right).max(MIN_AXES_SIDE);
    let avail_h = (height - margins.top - margins.bottom).max(MIN_AXES_SIDE);
    let side = avail_w.min(avail_h);
    let axes = Rect::new(
        margins.left + (avail_w - side) / 2.0,
        margins.top + (avail_h - side) / 2.0,
        side,
        side,
    );
    let cell = side / n as f32;
    let colormap = Colormap::blues();
    let cell_norm = Normalize::from_range(grid.value_range());
    let annotation_size = FONT_SIZE.min(cell * 0.4).max(MIN_ANNOTATION_SIZE);

    let mut elements = vec![Element::Fill {
        rect: Rect::new(0.0, 0.0, width, height),
        color: Rgb::WHITE,
    }];
    let mut cells = Vec::with_capacity(n * n);

    for (row, values) in grid.rows().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let rect = Rect::new(
                axes.x + col as f32 * cell,
                axes.y + row as f32 * cell,
                cell,
                cell,
            );
            let color = colormap.sample(cell_norm.apply(value as f64));
            elements.push(Element::Fill { rect, color });
            cells.push(CellGeometry {
                row,
                col,
                rect,
                value,
                color,
            });
        }
    }
    push_outline(&mut elements, &axes);

    // tick marks and class labels
    let mut x_label_bottom = axes.bottom() + TICK_LENGTH + TICK_PAD;
    let mut y_label_left = axes.x - TICK_LENGTH - TICK_PAD;
    for (index, label) in labels.iter().enumerate() {
        let center = (index as f32 + 0.5) * cell;

        let x = axes.x + center;
        elements.push(tick_line((x, axes.bottom()), (x, axes.bottom() + TICK_LENGTH)));
        let x_label = x_tick_label(label, index, (x, axes.bottom() + TICK_LENGTH + TICK_PAD));
        x_label_bottom = x_label_bottom.max(x_label.placement(metrics).bounds.bottom());
        elements.push(Element::Text(x_label));

        let y = axes.y + center;
        elements.push(tick_line((axes.x - TICK_LENGTH, y), (axes.x, y)));
        let y_label = TextItem {
            content: label.clone(),
            anchor: (axes.x - TICK_LENGTH - TICK_PAD, y),
            size: FONT_SIZE,
            h_align: HAlign::Right,
            v_align: VAlign::Center,
            rotation: 0.0,
            color: Rgb::BLACK,
            role: TextRole::YTick(index),
        };
        y_label_left = y_label_left.min(y_label.placement(metrics).bounds.x);
        elements.push(Element::Text(y_label));
    }

    for geometry in &cells {
        elements.push(Element::Text(TextItem {
            content: geometry.value.to_string(),
            anchor: geometry.rect.center(),
            size: annotation_size,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            rotation: 0.0,
            color: Rgb::BLACK,
            role: TextRole::Cell {
                row: geometry.row,
                col: geometry.col,
            },
        }));
    }

    let (axes_cx, axes_cy) = axes.center();
    elements.push(Element::Text(TextItem {
        content: X_AXIS_TITLE.to_string(),
        anchor: (axes_cx, x_label_bottom + LABEL_PAD),
        size: FONT_SIZE,
        h_align: HAlign::Center,
        v_align: VAlign::Top,
        rotation: 0.0,
        color: Rgb::BLACK,
        role: TextRole::XAxisTitle,
    }));
    elements.push(Element::Text(TextItem {
        content: Y_AXIS_TITLE.to_string(),
        anchor: (y_label_left - LABEL_PAD, axes_cy),
        size: FONT_SIZE,
        h_align: HAlign::Right,
        v_align: VAlign::Center,
        rotation: 90.0,
        color: Rgb::BLACK,
        role: TextRole::YAxisTitle,
    }));
    elements.push(Element::Text(TextItem {
        content: TITLE.to_string(),
        anchor: (axes_cx, axes.y - TITLE_PAD),
        size: TITLE_SIZE,
        h_align: HAlign::Center,
        v_align: VAlign::Bottom,
        rotation: 0.0,
        color: Rgb::BLACK,
        role: TextRole::Title,
    }));

    let colorbar = Rect::new(axes.right() + COLORBAR_GAP, axes.y, COLORBAR_WIDTH, side);
    elements.push(Element::Gradient {
        rect: colorbar,
        colormap,
    });
    push_outline(&mut elements, &colorbar);
    let span = hi.saturating_sub(lo).max(1) as f32;
    for &tick in bar_ticks {
        let y = colorbar.bottom() - (tick.saturating_sub(lo)) as f32 / span * colorbar.height;
        elements.push(tick_line(
            (colorbar.right(), y),
            (colorbar.right() + TICK_LENGTH, y),
        ));
        elements.push(Element::Text(TextItem {
            content: tick.to_string(),
            anchor: (colorbar.right() + TICK_LENGTH + TICK_PAD, y),
            size: FONT_SIZE,
            h_align: HAlign::Left,
            v_align: VAlign::Center,
            rotation: 0.0,
            color: Rgb::BLACK,
            role: TextRole::ColorbarTick(tick),
        }));
    }

    Scene {
        width,
        height,
        axes,
        colorbar,
        cells,
        elements,
    }
}

fn x_tick_label(label: &str, index: usize, anchor: (f32, f32)) -> TextItem {
    TextItem {
        content: label.to_string(),
        anchor,
        size: FONT_SIZE,
        h_align: HAlign::Right,
        v_align: VAlign::Top,
        rotation: X_TICK_ROTATION,
        color: Rgb::BLACK,
        role: TextRole::XTick(index),
    }
}

fn tick_line(from: (f32, f32), to: (f32, f32)) -> Element {
    Element::Line {
        from,
        to,
        width: LINE_WIDTH,
        color: Rgb::BLACK,
    }
}

fn push_outline(elements: &mut Vec<Element>, rect: &Rect) {
    let corners = [
        (rect.x, rect.y),
        (rect.right(), rect.y),
        (rect.right(), rect.bottom()),
        (rect.x, rect.bottom()),
    ];
    for i in 0..corners.len() {
        elements.push(Element::Line {
            from: corners[i],
            to: corners[(i + 1) % corners.len()],
            width: LINE_WIDTH,
            color: Rgb::BLACK,
        });
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
fn fit_text(text: &str, max_width: f32, size: f32, metrics: &dyn TextMetrics) -> String {
    if metrics.text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().chain(std::iter::once(&ELLIPSIS)).collect();
        if metrics.text_width(&candidate, size) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}
