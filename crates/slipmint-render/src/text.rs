//! Text measurement and drawing
//!
//! Two faces behind one API: a TTF rasterized through fontdue, and a
//! built-in 5x7 bitmap font so a machine with no font files still
//! renders deterministically.

use crate::canvas::{Baseline, Canvas, TextAlign};
use fontdue::FontSettings;
use slipmint_core::{Color, Rect};
use std::path::Path;
use tracing::debug;

const CHAR_W: f32 = 7.0;
const CHAR_H: f32 = 12.0;
const CHAR_GAP: f32 = 1.0;
const FONT_UNIT: f32 = 14.0;

/// Font rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read font: {0}")]
    FontIo(#[from] std::io::Error),

    #[error("failed to parse font: {0}")]
    FontParse(String),
}

/// A loaded typeface.
pub enum FontFace {
    /// Built-in 5x7 bitmap glyphs.
    Builtin,
    Ttf(fontdue::Font),
}

impl FontFace {
    pub fn builtin() -> Self {
        FontFace::Builtin
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, RenderError> {
        let font = fontdue::Font::from_bytes(data, FontSettings::default())
            .map_err(|e| RenderError::FontParse(e.to_string()))?;
        Ok(FontFace::Ttf(font))
    }

    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Scan common system font directories for a usable face.
    pub fn find_system() -> Option<Self> {
        let dirs = [
            "/usr/share/fonts/truetype/dejavu/",
            "/usr/share/fonts/truetype/liberation/",
            "/usr/share/fonts/truetype/",
            "/usr/share/fonts/opentype/",
            "/System/Library/Fonts/",
            "/System/Library/Fonts/Supplemental/",
            "/Library/Fonts/",
        ];
        let names = [
            "DejaVuSans-Bold",
            "DejaVuSans",
            "LiberationSans-Bold",
            "Arial",
            "Helvetica",
        ];
        for name in names {
            for dir in dirs {
                for ext in ["ttf", "otf"] {
                    let path = format!("{dir}{name}.{ext}");
                    if let Ok(face) = Self::from_path(Path::new(&path)) {
                        debug!("using system font {path}");
                        return Some(face);
                    }
                }
            }
        }
        None
    }

    /// Advance width of the text at the given pixel size.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match self {
            FontFace::Builtin => {
                let scale = size / FONT_UNIT;
                text.chars().count() as f32 * (CHAR_W + CHAR_GAP) * scale
            }
            FontFace::Ttf(font) => text
                .chars()
                .map(|c| font.metrics(c, size).advance_width)
                .sum(),
        }
    }
}

impl Canvas {
    /// Draw one line of text. `x`/`y` anchoring follows the canvas's
    /// current alignment and baseline state.
    pub fn fill_text(
        &mut self,
        font: &FontFace,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    ) {
        let draw_x = match self.align() {
            TextAlign::Left => x,
            TextAlign::Center => x - font.measure(text, size) / 2.0,
            TextAlign::Right => x - font.measure(text, size),
        };
        let baseline_y = match self.baseline() {
            Baseline::Alphabetic => y,
            Baseline::Middle => y + size * 0.35,
        };
        match font {
            FontFace::Builtin => draw_builtin(self, text, draw_x, baseline_y, size, color),
            FontFace::Ttf(f) => draw_ttf(self, f, text, draw_x, baseline_y, size, color),
        }
    }
}

fn draw_builtin(canvas: &mut Canvas, text: &str, x: f32, baseline: f32, size: f32, color: Color) {
    let scale = size / FONT_UNIT;
    let cw = CHAR_W * scale;
    let ch = CHAR_H * scale;
    let gap = CHAR_GAP * scale;
    let cell_w = cw / 5.0;
    let cell_h = ch / 7.0;

    let mut cx = x;
    for c in text.chars() {
        if c != ' ' {
            let rows = glyph_rows(c);
            let top = baseline - ch;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..5u32 {
                    if (bits >> (4 - col)) & 1 == 1 {
                        canvas.fill_rect(
                            Rect::new(
                                cx + col as f32 * cell_w,
                                top + row as f32 * cell_h,
                                cell_w,
                                cell_h,
                            ),
                            color,
                        );
                    }
                }
            }
        }
        cx += cw + gap;
    }
}

fn draw_ttf(
    canvas: &mut Canvas,
    font: &fontdue::Font,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    color: Color,
) {
    let mut cursor = x;
    for c in text.chars() {
        let (metrics, bitmap) = font.rasterize(c, size);
        if metrics.width > 0 && metrics.height > 0 {
            let gx = (cursor + metrics.xmin as f32).round() as i64;
            let gy = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage > 0 {
                        canvas.blend_pixel(gx + col as i64, gy + row as i64, color, coverage);
                    }
                }
            }
        }
        cursor += metrics.advance_width;
    }
}

/// Box glyph for anything the table does not cover.
const GLYPH_UNKNOWN: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

/// 5x7 glyph rows, MSB of the low 5 bits is the leftmost pixel.
fn glyph_rows(ch: char) -> [u8; 7] {
    // U+00B7, the meta line's odds/bet-type separator
    if ch == '·' {
        return [0b00000, 0b00000, 0b01100, 0b01100, 0b00000, 0b00000, 0b00000];
    }
    if !ch.is_ascii() {
        return GLYPH_UNKNOWN;
    }
    match ch as u8 {
        b'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        b'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        b'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        b'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        b'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        b'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        b'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        b'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        b'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        b'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        b'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        b'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        b'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        b'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        b'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        b'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        b'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        b'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        b'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        b'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        b'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        b'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100],
        b'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        b'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        b'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        b'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        b'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        b'b' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110],
        b'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        b'd' => [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111],
        b'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        b'f' => [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        b'g' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        b'h' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        b'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        b'j' => [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
        b'k' => [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        b'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        b'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        b'n' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        b'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        b'p' => [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        b'q' => [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001],
        b'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        b's' => [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110],
        b't' => [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        b'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        b'v' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        b'w' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        b'x' => [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        b'y' => [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        b'z' => [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        b'0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        b'1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        b'2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        b'3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        b'4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        b'5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        b'6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        b'7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        b'8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        b'9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        b'.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        b',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        b':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        b';' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b00100, 0b01000],
        b'!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        b'?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        b'-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        b'+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        b'=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        b'$' => [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        b'/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        b'\\' => [0b10000, 0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00001],
        b'(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        b')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        b'[' => [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
        b']' => [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
        b'%' => [0b11001, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b10011],
        b'#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        b'_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        b'<' => [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
        b'>' => [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000],
        b'\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        b'"' => [0b01010, 0b01010, 0b10100, 0b00000, 0b00000, 0b00000, 0b00000],
        b'@' => [0b01110, 0b10001, 0b10111, 0b10101, 0b10110, 0b10000, 0b01110],
        b'*' => [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000],
        b'&' => [0b01100, 0b10010, 0b01100, 0b10010, 0b10001, 0b10010, 0b01101],
        _ => GLYPH_UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(canvas: &Canvas, region: Rect, background: Color) -> usize {
        let mut count = 0;
        for y in region.y as u32..region.bottom() as u32 {
            for x in region.x as u32..region.right() as u32 {
                if canvas.pixel(x, y) != background {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_builtin_measure_scales() {
        let font = FontFace::builtin();
        let one = font.measure("a", 14.0);
        assert_eq!(one, CHAR_W + CHAR_GAP);
        assert_eq!(font.measure("ab", 14.0), one * 2.0);
        assert_eq!(font.measure("a", 28.0), one * 2.0);
        assert_eq!(font.measure("", 14.0), 0.0);
    }

    #[test]
    fn test_builtin_draw_leaves_ink() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(40, 40);
        canvas.clear(Color::MIDNIGHT);
        canvas.fill_text(&font, "A", 10.0, 30.0, 14.0, Color::SNOW);
        let ink = ink_count(&canvas, Rect::new(10.0, 18.0, 8.0, 12.0), Color::MIDNIGHT);
        assert!(ink > 5, "expected glyph ink, found {ink}");
    }

    #[test]
    fn test_space_draws_nothing() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(40, 40);
        canvas.clear(Color::MIDNIGHT);
        canvas.fill_text(&font, "   ", 5.0, 30.0, 14.0, Color::SNOW);
        let ink = ink_count(&canvas, Rect::new(0.0, 0.0, 40.0, 40.0), Color::MIDNIGHT);
        assert_eq!(ink, 0);
        assert!(font.measure("   ", 14.0) > 0.0);
    }

    #[test]
    fn test_center_align_straddles_anchor() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(60, 40);
        canvas.clear(Color::MIDNIGHT);
        canvas.set_align(TextAlign::Center);
        canvas.fill_text(&font, "MM", 30.0, 30.0, 14.0, Color::SNOW);
        let left = ink_count(&canvas, Rect::new(0.0, 0.0, 30.0, 40.0), Color::MIDNIGHT);
        let right = ink_count(&canvas, Rect::new(30.0, 0.0, 30.0, 40.0), Color::MIDNIGHT);
        assert!(left > 0 && right > 0);
    }

    #[test]
    fn test_right_align_ends_at_anchor() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(60, 40);
        canvas.clear(Color::MIDNIGHT);
        canvas.set_align(TextAlign::Right);
        canvas.fill_text(&font, "M", 50.0, 30.0, 14.0, Color::SNOW);
        let after = ink_count(&canvas, Rect::new(50.0, 0.0, 10.0, 40.0), Color::MIDNIGHT);
        assert_eq!(after, 0);
        let before = ink_count(&canvas, Rect::new(40.0, 0.0, 10.0, 40.0), Color::MIDNIGHT);
        assert!(before > 0);
    }

    #[test]
    fn test_middle_baseline_centers_on_anchor() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(40, 60);
        canvas.clear(Color::MIDNIGHT);
        canvas.set_baseline(Baseline::Middle);
        canvas.fill_text(&font, "E", 10.0, 30.0, 28.0, Color::SNOW);
        let above = ink_count(&canvas, Rect::new(0.0, 0.0, 40.0, 30.0), Color::MIDNIGHT);
        let below = ink_count(&canvas, Rect::new(0.0, 30.0, 40.0, 30.0), Color::MIDNIGHT);
        assert!(above > 0 && below > 0);
    }

    #[test]
    fn test_separator_and_currency_glyphs() {
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(60, 40);
        canvas.clear(Color::MIDNIGHT);
        canvas.fill_text(&font, "$·", 10.0, 30.0, 14.0, Color::SNOW);
        let ink = ink_count(&canvas, Rect::new(10.0, 10.0, 20.0, 25.0), Color::MIDNIGHT);
        assert!(ink > 8);
    }
}
