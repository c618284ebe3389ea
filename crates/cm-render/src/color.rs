//! Sequential colour scale for cell values.

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Self = Self([0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255]);

    /// Components scaled to `0.0..=1.0`, as PDF colour operators expect.
    #[must_use]
    pub fn unit(self) -> [f32; 3] {
        let [r, g, b] = self.0;
        [f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0]
    }

    /// Relative luminance in `0.0..=1.0`.
    #[must_use]
    pub fn luminance(self) -> f32 {
        let [r, g, b] = self.unit();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

/// ColorBrewer "Blues", light to dark.
const BLUES: [[u8; 3]; 9] = [
    [0xf7, 0xfb, 0xff],
    [0xde, 0xeb, 0xf7],
    [0xc6, 0xdb, 0xef],
    [0x9e, 0xca, 0xe1],
    [0x6b, 0xae, 0xd6],
    [0x42, 0x92, 0xc6],
    [0x21, 0x71, 0xb5],
    [0x08, 0x51, 0x9c],
    [0x08, 0x30, 0x6b],
];

/// A colour scale sampled by interpolating between evenly spaced anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    anchors: &'static [[u8; 3]],
}

impl Colormap {
    /// Monotonic light-to-dark blue scale.
    #[must_use]
    pub const fn blues() -> Self {
        Self { anchors: &BLUES }
    }

    /// Colour at position `t`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn sample(&self, t: f32) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let last = self.anchors.len() - 1;
        let scaled = t * last as f32;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = scaled - lower as f32;
        let a = self.anchors[lower];
        let b = self.anchors[upper];
        let mix = |i: usize| {
            let value = f32::from(a[i]) + (f32::from(b[i]) - f32::from(a[i])) * frac;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb([mix(0), mix(1), mix(2)])
    }
}

/// Linear mapping of counts onto `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub min: f64,
    pub max: f64,
}

impl Normalize {
    /// Normalise over the observed range of a grid.
    #[must_use]
    pub fn from_range((min, max): (u64, u64)) -> Self {
        Self {
            min: min as f64,
            max: max as f64,
        }
    }

    /// Position of `value` on the scale. A flat range maps everything to 0.
    #[must_use]
    pub fn apply(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (((value - self.min) / span).clamp(0.0, 1.0)) as f32
    }
}
