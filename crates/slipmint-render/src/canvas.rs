//! CPU raster surface
//!
//! A software 2D canvas over an RGBA bitmap: alpha-over fills for the
//! shapes the slip needs, bitmap blits with cover/stretch scaling, and a
//! save/restore stack for text alignment, baseline and clip state.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use slipmint_core::{Color, Rect};

/// Horizontal anchoring of drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchoring of drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// `y` is the text baseline.
    #[default]
    Alphabetic,
    /// `y` is the visual middle of the text.
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct DrawState {
    align: TextAlign,
    baseline: Baseline,
    clip: Option<ClipShape>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClipShape {
    rect: Rect,
    radius: f32,
}

/// True when the point sits inside the rounded rectangle.
fn rounded_contains(rect: Rect, radius: f32, px: f32, py: f32) -> bool {
    if !rect.contains(px, py) {
        return false;
    }
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    let dx = (rect.x + r - px).max(px - (rect.right() - r)).max(0.0);
    let dy = (rect.y + r - py).max(py - (rect.bottom() - r)).max(0.0);
    dx * dx + dy * dy <= r * r
}

/// Software raster target for one slip render.
pub struct Canvas {
    pixels: RgbaImage,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 255])),
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Reallocate the surface. Drops all pixels and draw state.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width(), self.height()) {
            self.pixels = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 255]));
        }
        self.state = DrawState::default();
        self.stack.clear();
    }

    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(prev) = self.stack.pop() {
            self.state = prev;
        }
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    pub fn set_baseline(&mut self, baseline: Baseline) {
        self.state.baseline = baseline;
    }

    pub(crate) fn align(&self) -> TextAlign {
        self.state.align
    }

    pub(crate) fn baseline(&self) -> Baseline {
        self.state.baseline
    }

    /// Restrict subsequent draws to a rounded rectangle. Replaces any
    /// active clip; pair with `save`/`restore` to scope it.
    pub fn clip_rounded_rect(&mut self, rect: Rect, radius: f32) {
        self.state.clip = Some(ClipShape { rect, radius });
    }

    fn clip_allows(&self, px: f32, py: f32) -> bool {
        match self.state.clip {
            Some(clip) => rounded_contains(clip.rect, clip.radius, px, py),
            None => true,
        }
    }

    /// Reset every pixel, ignoring clip and draw state.
    pub fn clear(&mut self, color: Color) {
        let px = Rgba(color.to_array());
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Source-over blend of one pixel. `coverage` scales the color's alpha.
    pub(crate) fn blend_pixel(&mut self, x: i64, y: i64, color: Color, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        if !self.clip_allows(x as f32 + 0.5, y as f32 + 0.5) {
            return;
        }
        let a = (color.a as u16 * coverage as u16 + 127) / 255;
        if a == 0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        let inv = 255 - a;
        let mixc = |s: u8, d: u8| ((s as u16 * a + d as u16 * inv + 127) / 255) as u8;
        dst.0 = [
            mixc(color.r, dst.0[0]),
            mixc(color.g, dst.0[1]),
            mixc(color.b, dst.0[2]),
            255,
        ];
    }

    fn fill_span(&mut self, rect: Rect, color: Color, inside: impl Fn(f32, f32) -> bool) {
        let x0 = rect.x.floor().max(0.0) as i64;
        let y0 = rect.y.floor().max(0.0) as i64;
        let x1 = (rect.right().ceil() as i64).min(self.width() as i64);
        let y1 = (rect.bottom().ceil() as i64).min(self.height() as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                if inside(px, py) {
                    self.blend_pixel(x, y, color, 255);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_span(rect, color, |px, py| rect.contains(px, py));
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.fill_span(rect, color, |px, py| {
            rounded_contains(rect, radius, px, py)
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let bounds = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        let r2 = radius * radius;
        self.fill_span(bounds, color, |px, py| {
            let (dx, dy) = (px - cx, py - cy);
            dx * dx + dy * dy <= r2
        });
    }

    pub fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
        let min_x = a.0.min(b.0).min(c.0);
        let min_y = a.1.min(b.1).min(c.1);
        let max_x = a.0.max(b.0).max(c.0);
        let max_y = a.1.max(b.1).max(c.1);
        let bounds = Rect::new(min_x, min_y, max_x - min_x, max_y - min_y);
        let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        self.fill_span(bounds, color, |px, py| {
            let e0 = edge(a, b, px, py);
            let e1 = edge(b, c, px, py);
            let e2 = edge(c, a, px, py);
            (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0)
        });
    }

    /// Convex quad, vertices in winding order.
    pub fn fill_quad(&mut self, pts: [(f32, f32); 4], color: Color) {
        self.fill_triangle(pts[0], pts[1], pts[2], color);
        self.fill_triangle(pts[0], pts[2], pts[3], color);
    }

    fn blit(&mut self, img: &RgbaImage, origin_x: f32, origin_y: f32, window: Rect) {
        let x0 = window.x.floor().max(0.0) as i64;
        let y0 = window.y.floor().max(0.0) as i64;
        let x1 = (window.right().ceil() as i64).min(self.width() as i64);
        let y1 = (window.bottom().ceil() as i64).min(self.height() as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                let sx = x - origin_x.round() as i64;
                let sy = y - origin_y.round() as i64;
                if sx < 0 || sy < 0 || sx >= img.width() as i64 || sy >= img.height() as i64 {
                    continue;
                }
                let src = img.get_pixel(sx as u32, sy as u32).0;
                self.blend_pixel(x, y, Color::rgba(src[0], src[1], src[2], 255), src[3]);
            }
        }
    }

    /// Draw the bitmap stretched to exactly fill `dst`.
    pub fn draw_bitmap(&mut self, img: &RgbaImage, dst: Rect) {
        let (w, h) = (dst.w.round() as u32, dst.h.round() as u32);
        if w == 0 || h == 0 || img.width() == 0 || img.height() == 0 {
            return;
        }
        if (w, h) == img.dimensions() {
            self.blit(img, dst.x, dst.y, dst);
        } else {
            let resized = imageops::resize(img, w, h, FilterType::Triangle);
            self.blit(&resized, dst.x, dst.y, dst);
        }
    }

    /// Draw the bitmap scaled to cover all of `dst`, centered, with the
    /// overflow cropped away.
    pub fn draw_bitmap_cover(&mut self, img: &RgbaImage, dst: Rect) {
        if dst.w <= 0.0 || dst.h <= 0.0 || img.width() == 0 || img.height() == 0 {
            return;
        }
        let scale = (dst.w / img.width() as f32).max(dst.h / img.height() as f32);
        let w = (img.width() as f32 * scale).round().max(1.0) as u32;
        let h = (img.height() as f32 * scale).round().max(1.0) as u32;
        let resized = imageops::resize(img, w, h, FilterType::Triangle);
        let origin_x = dst.x + (dst.w - w as f32) / 2.0;
        let origin_y = dst.y + (dst.h - h as f32) / 2.0;
        self.blit(&resized, origin_x, origin_y, dst);
    }

    /// Draw the bitmap scaled to `dst.w` wide, top-aligned, aspect kept.
    pub fn draw_bitmap_stretch_top(&mut self, img: &RgbaImage, dst: Rect) {
        if dst.w <= 0.0 || img.width() == 0 || img.height() == 0 {
            return;
        }
        let scale = dst.w / img.width() as f32;
        let h = (img.height() as f32 * scale).round().max(1.0) as u32;
        let resized = imageops::resize(img, dst.w.round().max(1.0) as u32, h, FilterType::Triangle);
        let window = Rect::new(dst.x, dst.y, dst.w, (h as f32).min(dst.h));
        self.blit(&resized, dst.x, dst.y, window);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let p = self.pixels.get_pixel(x, y).0;
        Color::rgba(p[0], p[1], p[2], p[3])
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}
