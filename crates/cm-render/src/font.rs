//! TrueType font loading, measurement and glyph rasterisation.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use image::{GrayImage, Luma};
use swash::scale::{Render, ScaleContext, Source};
use swash::shape::ShapeContext;
use swash::zeno::{Format, Vector};
use swash::{CacheKey, FontRef, GlyphId};

use crate::error::{RenderError, Result};
use crate::metrics::TextMetrics;

/// A parsed font used for raster text.
#[derive(Clone)]
pub struct GlyphFont {
    data: Cow<'static, [u8]>,
    offset: u32,
    key: CacheKey,
    units_per_em: f32,
    ascent: f32,
    descent: f32,
    shaper: Arc<Mutex<ShapeContext>>,
}

/// One shaped glyph, positioned relative to the start of its run.
#[derive(Debug, Clone, Copy)]
struct PlacedGlyph {
    id: GlyphId,
    /// Pen position plus the shaper's offset, in pixels.
    x: f32,
    y: f32,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont")
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish_non_exhaustive()
    }
}

impl GlyphFont {
    /// The embedded sans-serif font.
    pub fn embedded() -> Result<Self> {
        Self::from_data(Cow::Borrowed(epaint_default_fonts::UBUNTU_LIGHT))
    }

    /// Load a TrueType/OpenType font file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_data(Cow::Owned(data)).map_err(|err| match err {
            RenderError::Font { message } => RenderError::Font {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Parse font bytes (first face of a collection).
    pub fn from_data(data: Cow<'static, [u8]>) -> Result<Self> {
        let font = FontRef::from_index(&data, 0).ok_or_else(|| RenderError::Font {
            message: "unrecognised font data".to_string(),
        })?;
        let metrics = font.metrics(&[]);
        if metrics.units_per_em == 0 {
            return Err(RenderError::Font {
                message: "font reports zero units per em".to_string(),
            });
        }
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            units_per_em: f32::from(metrics.units_per_em),
            ascent: metrics.ascent.abs(),
            descent: metrics.descent.abs(),
            offset,
            key,
            data,
            shaper: Arc::new(Mutex::new(ShapeContext::new())),
        })
    }

    fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: self.data.as_ref(),
            offset: self.offset,
            key: self.key,
        }
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.units_per_em
    }

    /// Shape `text` at `size`, applying the font's kerning and ligatures.
    /// Returns the placed glyphs and the total advance.
    fn shape(&self, text: &str, size: f32) -> (Vec<PlacedGlyph>, f32) {
        let mut context = self.shaper.lock().unwrap_or_else(PoisonError::into_inner);
        let mut shaper = context.builder(self.font_ref()).size(size).build();
        shaper.add_str(text);

        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen_x = 0.0;
        shaper.shape_with(|cluster| {
            for glyph in cluster.glyphs {
                glyphs.push(PlacedGlyph {
                    id: glyph.id,
                    x: pen_x + glyph.x,
                    y: glyph.y,
                });
                pen_x += glyph.advance;
            }
        });
        (glyphs, pen_x)
    }

    /// Rasterise `text` at `size` pixels into a coverage mask.
    pub fn render_mask(&self, context: &mut ScaleContext, text: &str, size: f32) -> TextMask {
        let (glyphs, advance) = self.shape(text, size);
        let pad = (size * 0.15).ceil() + 2.0;
        let width = (advance + 2.0 * pad).ceil().max(1.0) as u32;
        let height = (self.line_height(size) + 2.0 * pad).ceil().max(1.0) as u32;
        let baseline = (pad + self.ascent(size)).round();
        let mut mask = GrayImage::new(width, height);
        let mut scaler = context
            .builder(self.font_ref())
            .size(size)
            .hint(false)
            .build();

        for glyph in glyphs {
            let pen_x = pad + glyph.x;
            let pen_y = (baseline - glyph.y).round();
            let rendered = Render::new(&[Source::Outline])
                .format(Format::Alpha)
                .offset(Vector::new(pen_x.fract(), 0.0))
                .render(&mut scaler, glyph.id);
            let Some(rendered) = rendered else {
                continue;
            };

            let origin_x = pen_x.floor() as i32 + rendered.placement.left;
            let origin_y = pen_y as i32 - rendered.placement.top;
            for py in 0..rendered.placement.height {
                for px in 0..rendered.placement.width {
                    let idx = (py * rendered.placement.width + px) as usize;
                    let alpha = rendered.data.get(idx).copied().unwrap_or(0);
                    if alpha == 0 {
                        continue;
                    }
                    let x = origin_x + px as i32;
                    let y = origin_y + py as i32;
                    if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                        let pixel = mask.get_pixel_mut(x as u32, y as u32);
                        pixel.0[0] = pixel.0[0].max(alpha);
                    }
                }
            }
        }

        TextMask {
            image: mask,
            origin: (pad, baseline),
        }
    }
}

impl TextMetrics for GlyphFont {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.shape(text, size).1
    }

    fn ascent(&self, size: f32) -> f32 {
        self.ascent * self.scale(size)
    }

    fn descent(&self, size: f32) -> f32 {
        self.descent * self.scale(size)
    }
}

/// Glyph coverage for one line of text.
#[derive(Debug, Clone)]
pub struct TextMask {
    /// Coverage, 0 = transparent, 255 = opaque.
    pub image: GrayImage,
    /// Start of the baseline inside the mask, in pixels.
    pub origin: (f32, f32),
}

impl TextMask {
    /// Coverage at a fractional position, bilinearly interpolated.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x = x - 0.5;
        let y = y - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let at = |xi: f32, yi: f32| -> f32 {
            if xi < 0.0 || yi < 0.0 {
                return 0.0;
            }
            let (xi, yi) = (xi as u32, yi as u32);
            if xi >= self.image.width() || yi >= self.image.height() {
                return 0.0;
            }
            let Luma([value]) = *self.image.get_pixel(xi, yi);
            f32::from(value)
        };
        let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1.0, y0) * fx;
        let bottom = at(x0, y0 + 1.0) * (1.0 - fx) + at(x0 + 1.0, y0 + 1.0) * fx;
        (top * (1.0 - fy) + bottom * fy) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_font_parses_and_measures() {
        let font = GlyphFont::embedded().unwrap();
        assert!(font.ascent(10.0) > 5.0);
        assert!(font.descent(10.0) > 0.5);
        let short = font.text_width("1", 10.0);
        let long = font.text_width("1111", 10.0);
        assert!(short > 0.0);
        assert!((long - 4.0 * short).abs() < 1e-3);
        // widths scale linearly with size
        assert!((font.text_width("Dog", 20.0) - 2.0 * font.text_width("Dog", 10.0)).abs() < 1e-3);
    }

    #[test]
    fn rendered_mask_has_ink() {
        let font = GlyphFont::embedded().unwrap();
        let mut context = ScaleContext::new();
        let mask = font.render_mask(&mut context, "10", 40.0);
        let inked = mask.image.pixels().filter(|p| p.0[0] > 128).count();
        assert!(inked > 20, "expected glyph coverage, got {inked} pixels");
        assert!(mask.origin.1 > 0.0);
    }

    #[test]
    fn drawn_ink_stays_within_the_measured_width() {
        let font = GlyphFont::embedded().unwrap();
        let mut context = ScaleContext::new();
        for text in ["AVATAR", "Toyota Wagon", "LTA VAT", "Predicted"] {
            let size = 48.0;
            let mask = font.render_mask(&mut context, text, size);
            let right_ink = mask
                .image
                .enumerate_pixels()
                .filter(|(_, _, p)| p.0[0] > 0)
                .map(|(x, _, _)| x)
                .max()
                .unwrap();
            let measured_end = mask.origin.0 + font.text_width(text, size);
            assert!(
                (right_ink as f32) <= measured_end + size * 0.1,
                "{text:?}: ink reaches {right_ink}, measured end {measured_end}"
            );
            assert!(
                (right_ink as f32) >= measured_end - size * 0.3,
                "{text:?}: ink stops at {right_ink}, measured end {measured_end}"
            );
        }
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = GlyphFont::from_data(Cow::Owned(vec![0u8; 16])).unwrap_err();
        assert!(matches!(err, RenderError::Font { .. }));
    }
}
