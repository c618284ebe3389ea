//! Text measurement used by the layout.

/// Font measurements in points for a given font size.
pub trait TextMetrics {
    /// Advance width of `text`.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Distance from baseline to the top of tall glyphs.
    fn ascent(&self, size: f32) -> f32;

    /// Distance from baseline to the bottom of descenders, as a positive number.
    fn descent(&self, size: f32) -> f32;

    /// Full line box height.
    fn line_height(&self, size: f32) -> f32 {
        self.ascent(size) + self.descent(size)
    }
}

/// Advance widths of the standard Helvetica font for ASCII 32..=126, in
/// 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_DEFAULT_WIDTH: u16 = 556;
const HELVETICA_ELLIPSIS_WIDTH: u16 = 1000;
const HELVETICA_ASCENT: f32 = 0.718;
const HELVETICA_DESCENT: f32 = 0.207;

/// Metrics of the PDF base-14 Helvetica font.
///
/// Characters outside printable ASCII, other than the ellipsis, are measured
/// with the width of a digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn char_width(ch: char) -> u16 {
        let code = ch as u32;
        match code {
            32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
            0x2026 => HELVETICA_ELLIPSIS_WIDTH,
            _ => HELVETICA_DEFAULT_WIDTH,
        }
    }
}

impl TextMetrics for HelveticaMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| u32::from(Self::char_width(ch))).sum();
        units as f32 * size / 1000.0
    }

    fn ascent(&self, size: f32) -> f32 {
        HELVETICA_ASCENT * size
    }

    fn descent(&self, size: f32) -> f32 {
        HELVETICA_DESCENT * size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_share_one_width() {
        let metrics = HelveticaMetrics;
        assert_eq!(metrics.text_width("0", 10.0), 5.56);
        assert_eq!(metrics.text_width("10", 10.0), metrics.text_width("99", 10.0));
    }

    #[test]
    fn table_covers_printable_ascii() {
        assert_eq!(HelveticaMetrics::char_width(' '), 278);
        assert_eq!(HelveticaMetrics::char_width('W'), 944);
        assert_eq!(HelveticaMetrics::char_width('~'), 584);
        assert_eq!(HelveticaMetrics::char_width('é'), HELVETICA_DEFAULT_WIDTH);
    }
}
