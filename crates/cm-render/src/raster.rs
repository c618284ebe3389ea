//! Pixel backend for PNG and JPEG output.

use std::collections::HashMap;

use image::{Rgb as Pixel, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;
use swash::scale::ScaleContext;
use tracing::trace;

use crate::color::Rgb;
use crate::font::{GlyphFont, TextMask};
use crate::layout::{POINTS_PER_INCH, canvas_size};
use crate::scene::{Element, Rect, Scene, TextItem, rotate};

/// Draw `scene` onto a white canvas of 7 × 6 inches at `dpi`.
#[must_use]
pub fn rasterize(scene: &Scene, font: &GlyphFont, dpi: u32) -> RgbImage {
    let (width, height) = canvas_size(dpi);
    let mut canvas = Canvas {
        image: RgbImage::from_pixel(width, height, pixel(Rgb::WHITE)),
        scale: dpi as f32 / POINTS_PER_INCH,
        font,
        context: ScaleContext::new(),
        masks: HashMap::new(),
    };
    for element in &scene.elements {
        canvas.draw(element);
    }
    trace!(width, height, masks = canvas.masks.len(), "rasterised scene");
    canvas.image
}

struct Canvas<'a> {
    image: RgbImage,
    /// Pixels per point.
    scale: f32,
    font: &'a GlyphFont,
    context: ScaleContext,
    masks: HashMap<(String, u32), TextMask>,
}

impl Canvas<'_> {
    fn draw(&mut self, element: &Element) {
        match element {
            Element::Fill { rect, color } => self.fill(rect, *color),
            Element::Line {
                from,
                to,
                width,
                color,
            } => self.line(*from, *to, *width, *color),
            Element::Gradient { rect, colormap } => {
                let (top, bottom) = (self.px(rect.y), self.px(rect.bottom()));
                let rows = (bottom - top).max(1);
                for offset in 0..rows {
                    let t = 1.0 - (offset as f32 + 0.5) / rows as f32;
                    let row = Rect::new(
                        rect.x,
                        (top + offset) as f32 / self.scale,
                        rect.width,
                        1.0 / self.scale,
                    );
                    self.fill(&row, colormap.sample(t));
                }
            }
            Element::Text(text) => self.text(text),
        }
    }

    fn px(&self, points: f32) -> i32 {
        (points * self.scale).round() as i32
    }

    fn fill(&mut self, rect: &Rect, color: Rgb) {
        let x0 = self.px(rect.x);
        let y0 = self.px(rect.y);
        let width = (self.px(rect.right()) - x0).max(1) as u32;
        let height = (self.px(rect.bottom()) - y0).max(1) as u32;
        draw_filled_rect_mut(
            &mut self.image,
            PixelRect::at(x0, y0).of_size(width, height),
            pixel(color),
        );
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb) {
        let half = width / 2.0;
        if from.0 == to.0 || from.1 == to.1 {
            // axis-aligned strokes become thin rectangles with square caps
            let x = from.0.min(to.0) - half;
            let y = from.1.min(to.1) - half;
            let rect = Rect::new(
                x,
                y,
                (from.0 - to.0).abs() + width,
                (from.1 - to.1).abs() + width,
            );
            self.fill(&rect, color);
        } else {
            draw_line_segment_mut(
                &mut self.image,
                (from.0 * self.scale, from.1 * self.scale),
                (to.0 * self.scale, to.1 * self.scale),
                pixel(color),
            );
        }
    }

    fn text(&mut self, item: &TextItem) {
        if item.content.is_empty() {
            return;
        }
        let placement = item.placement(self.font);
        let size = item.size * self.scale;
        let key = (item.content.clone(), size.to_bits());
        if !self.masks.contains_key(&key) {
            let mask = self
                .font
                .render_mask(&mut self.context, &item.content, size);
            self.masks.insert(key.clone(), mask);
        }
        let Some(mask) = self.masks.get(&key) else {
            return;
        };
        let origin = (placement.origin.0 * self.scale, placement.origin.1 * self.scale);

        if item.rotation == 0.0 {
            blit(&mut self.image, mask, origin, item.color);
            return;
        }

        let (sin, cos) = item.rotation.to_radians().sin_cos();
        let bounds = placement.bounds;
        let x0 = (bounds.x * self.scale).floor() as i64 - 2;
        let y0 = (bounds.y * self.scale).floor() as i64 - 2;
        let x1 = (bounds.right() * self.scale).ceil() as i64 + 2;
        let y1 = (bounds.bottom() * self.scale).ceil() as i64 + 2;
        let (width, height) = self.image.dimensions();
        for y in y0.max(0)..y1.min(i64::from(height)) {
            for x in x0.max(0)..x1.min(i64::from(width)) {
                let dx = x as f32 + 0.5 - origin.0;
                let dy = y as f32 + 0.5 - origin.1;
                // undo the rotation to find the spot in the upright mask
                let (u, v) = rotate(dx, dy, -sin, cos);
                let coverage = mask.sample(mask.origin.0 + u, mask.origin.1 + v);
                if coverage > 0.0 {
                    blend(self.image.get_pixel_mut(x as u32, y as u32), item.color, coverage);
                }
            }
        }
    }
}

fn blit(image: &mut RgbImage, mask: &TextMask, origin: (f32, f32), color: Rgb) {
    let left = (origin.0 - mask.origin.0).round() as i64;
    let top = (origin.1 - mask.origin.1).round() as i64;
    let (width, height) = image.dimensions();
    for (mx, my, coverage) in mask.image.enumerate_pixels() {
        let alpha = coverage.0[0];
        if alpha == 0 {
            continue;
        }
        let x = left + i64::from(mx);
        let y = top + i64::from(my);
        if x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height) {
            blend(
                image.get_pixel_mut(x as u32, y as u32),
                color,
                f32::from(alpha) / 255.0,
            );
        }
    }
}

fn blend(dest: &mut Pixel<u8>, color: Rgb, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    let inv = 1.0 - alpha;
    for (channel, source) in dest.0.iter_mut().zip(color.0) {
        *channel = (f32::from(source) * alpha + f32::from(*channel) * inv).round() as u8;
    }
}

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel(color.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Colormap;
    use crate::scene::{HAlign, TextRole, VAlign};

    fn scene(elements: Vec<Element>) -> Scene {
        Scene {
            width: 504.0,
            height: 432.0,
            axes: Rect::new(0.0, 0.0, 1.0, 1.0),
            colorbar: Rect::new(0.0, 0.0, 1.0, 1.0),
            cells: Vec::new(),
            elements,
        }
    }

    #[test]
    fn fills_land_at_scaled_coordinates() {
        let font = GlyphFont::embedded().unwrap();
        let color = Rgb([10, 20, 30]);
        let image = rasterize(
            &scene(vec![Element::Fill {
                rect: Rect::new(72.0, 72.0, 72.0, 36.0),
                color,
            }]),
            &font,
            300,
        );
        assert_eq!(image.dimensions(), (2100, 1800));
        assert_eq!(image.get_pixel(300, 300).0, color.0);
        assert_eq!(image.get_pixel(599, 449).0, color.0);
        assert_eq!(image.get_pixel(600, 300).0, Rgb::WHITE.0);
        assert_eq!(image.get_pixel(300, 450).0, Rgb::WHITE.0);
    }

    #[test]
    fn gradient_is_light_at_bottom() {
        let font = GlyphFont::embedded().unwrap();
        let image = rasterize(
            &scene(vec![Element::Gradient {
                rect: Rect::new(10.0, 10.0, 20.0, 200.0),
                colormap: Colormap::blues(),
            }]),
            &font,
            300,
        );
        let top = Rgb(image.get_pixel(80, 45).0).luminance();
        let bottom = Rgb(image.get_pixel(80, 870).0).luminance();
        assert!(top < bottom);
    }

    #[test]
    fn rotated_text_leaves_ink_inside_its_bounds() {
        let font = GlyphFont::embedded().unwrap();
        let item = TextItem {
            content: "Predicted".to_string(),
            anchor: (200.0, 200.0),
            size: 10.0,
            h_align: HAlign::Right,
            v_align: VAlign::Top,
            rotation: 45.0,
            color: Rgb::BLACK,
            role: TextRole::XTick(0),
        };
        let bounds = item.placement(&font).bounds;
        let image = rasterize(&scene(vec![Element::Text(item)]), &font, 300);
        let scale = 300.0 / 72.0;
        let mut inside = 0;
        for (x, y, p) in image.enumerate_pixels() {
            if p.0 != Rgb::WHITE.0 {
                let (px, py) = (x as f32 / scale, y as f32 / scale);
                assert!(
                    px > bounds.x - 2.0
                        && px < bounds.right() + 2.0
                        && py > bounds.y - 2.0
                        && py < bounds.bottom() + 2.0,
                    "ink at ({px}, {py}) outside {bounds:?}"
                );
                inside += 1;
            }
        }
        assert!(inside > 50);
    }
}
