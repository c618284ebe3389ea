//! Backend-independent drawing primitives.
//!
//! Coordinates are in points (1/72 inch) with the origin at the top-left
//! corner of the figure and y growing downwards. Backends scale to pixels or
//! flip the y axis as they need.

use crate::color::{Colormap, Rgb};
use crate::metrics::TextMetrics;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Whether `other` lies fully inside, allowing `tolerance` of overhang.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }
}

/// Horizontal alignment of a text's bounding box to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment of a text's bounding box to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// What a piece of text labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    XAxisTitle,
    YAxisTitle,
    /// Predicted-class label under column `index`.
    XTick(usize),
    /// Actual-class label beside row `index`.
    YTick(usize),
    /// Count annotation of a cell.
    Cell { row: usize, col: usize },
    /// Colour bar value label.
    ColorbarTick(u64),
}

/// A single line of text placed by anchor and alignment.
///
/// Alignment applies to the bounding box of the rotated text, so a label
/// rotated 45° with `HAlign::Right`/`VAlign::Top` hangs below and left of its
/// anchor with its top-right corner on the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub content: String,
    pub anchor: (f32, f32),
    pub size: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f32,
    pub color: Rgb,
    pub role: TextRole,
}

/// Resolved placement of a text item for a particular font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    /// Start of the baseline, where drawing begins.
    pub origin: (f32, f32),
    /// Bounding box of the rotated text.
    pub bounds: Rect,
}

impl TextItem {
    /// Where the baseline starts and how much space the text covers.
    #[must_use]
    pub fn placement(&self, metrics: &dyn TextMetrics) -> TextPlacement {
        let width = metrics.text_width(&self.content, self.size);
        let ascent = metrics.ascent(self.size);
        let descent = metrics.descent(self.size);
        let (sin, cos) = self.rotation.to_radians().sin_cos();

        // corners of the unrotated box, relative to the baseline start (y down)
        let corners = [
            (0.0, -ascent),
            (width, -ascent),
            (0.0, descent),
            (width, descent),
        ];
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (cx, cy) in corners {
            let (rx, ry) = rotate(cx, cy, sin, cos);
            min_x = min_x.min(rx);
            max_x = max_x.max(rx);
            min_y = min_y.min(ry);
            max_y = max_y.max(ry);
        }

        let (ax, ay) = self.anchor;
        let origin_x = match self.h_align {
            HAlign::Left => ax - min_x,
            HAlign::Center => ax - (min_x + max_x) / 2.0,
            HAlign::Right => ax - max_x,
        };
        let origin_y = match self.v_align {
            VAlign::Top => ay - min_y,
            VAlign::Center => ay - (min_y + max_y) / 2.0,
            VAlign::Bottom => ay - max_y,
        };

        TextPlacement {
            origin: (origin_x, origin_y),
            bounds: Rect::new(
                origin_x + min_x,
                origin_y + min_y,
                max_x - min_x,
                max_y - min_y,
            ),
        }
    }
}

/// Rotate a y-down offset counter-clockwise as seen on screen.
#[must_use]
pub fn rotate(x: f32, y: f32, sin: f32, cos: f32) -> (f32, f32) {
    (x * cos + y * sin, -x * sin + y * cos)
}

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Solid rectangle.
    Fill { rect: Rect, color: Rgb },
    /// Straight line segment.
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    /// Vertical colour gradient, lightest at the bottom.
    Gradient {
        rect: Rect,
        colormap: Colormap,
    },
    Text(TextItem),
}

/// Heatmap cell with its count and colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub value: u64,
    pub color: Rgb,
}

/// A laid-out figure ready for a backend.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Figure size in points.
    pub width: f32,
    pub height: f32,
    /// Heatmap area.
    pub axes: Rect,
    /// Colour bar area.
    pub colorbar: Rect,
    pub cells: Vec<CellGeometry>,
    /// Everything to draw, back to front.
    pub elements: Vec<Element>,
}

impl Scene {
    /// All text items in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Text items with the given role.
    pub fn texts_with_role(&self, role: TextRole) -> impl Iterator<Item = &TextItem> {
        self.texts().filter(move |text| text.role == role)
    }

    /// Figure bounds.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HelveticaMetrics;

    fn item(h_align: HAlign, v_align: VAlign, rotation: f32) -> TextItem {
        TextItem {
            content: "Dog".to_string(),
            anchor: (100.0, 50.0),
            size: 10.0,
            h_align,
            v_align,
            rotation,
            color: Rgb::BLACK,
            role: TextRole::Title,
        }
    }

    #[test]
    fn centered_text_is_centered_on_anchor() {
        let placement = item(HAlign::Center, VAlign::Center, 0.0).placement(&HelveticaMetrics);
        let (cx, cy) = placement.bounds.center();
        assert!((cx - 100.0).abs() < 1e-3);
        assert!((cy - 50.0).abs() < 1e-3);
    }

    #[test]
    fn rotated_right_top_hangs_below_left() {
        let placement = item(HAlign::Right, VAlign::Top, 45.0).placement(&HelveticaMetrics);
        assert!((placement.bounds.right() - 100.0).abs() < 1e-3);
        assert!((placement.bounds.y - 50.0).abs() < 1e-3);
        // text runs up and to the right, so the baseline starts bottom-left
        assert!(placement.origin.0 < 100.0);
        assert!(placement.origin.1 > 50.0);
    }

    #[test]
    fn vertical_text_is_tall_and_narrow() {
        let placement = item(HAlign::Center, VAlign::Center, 90.0).placement(&HelveticaMetrics);
        assert!(placement.bounds.height > placement.bounds.width);
        let width = HelveticaMetrics.text_width("Dog", 10.0);
        assert!((placement.bounds.height - width).abs() < 1e-3);
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
        assert!(a.union(&b).contains_rect(&a, 0.0));
    }
}
