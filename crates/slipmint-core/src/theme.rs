//! Theme and layout configuration
//!
//! One parametrized description of the slip's look. What used to be
//! near-duplicate draw routines per visual variant collapses into a
//! `SlipTheme` (colors, banner style) plus a `Layout` per size preset.

use crate::color::Color;
use crate::slip::{SlipRecord, SlipSize, SlipStatus};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// How banner art fills the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtFit {
    /// Scale to cover the whole card, centered, cropping overflow.
    Cover,
    /// Scale to the card width, aligned to the top edge.
    Stretch,
}

/// What the banner region shows behind the content panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    Art { fit: ArtFit },
    Confetti { count: u32, seed: u32 },
}

impl Default for BannerStyle {
    fn default() -> Self {
        BannerStyle::Art { fit: ArtFit::Cover }
    }
}

/// Geometry for one size preset. All offsets are in canvas pixels;
/// rect getters derive the composed regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub canvas_w: u32,
    pub canvas_h: u32,
    /// Uniform page margin around the card.
    pub margin: f32,
    pub card_radius: f32,
    /// Logo top-left, relative to the card.
    pub logo_offset: (f32, f32),
    pub logo_width: f32,
    /// Horizontal inset of the content panel inside the card.
    pub panel_inset: f32,
    /// Card-relative y where the panel starts (the banner band above it).
    pub panel_top: f32,
    /// Art strip left exposed below the panel, perforation included.
    pub panel_bottom_gap: f32,
    pub panel_radius: f32,
    pub perf_radius: f32,
    pub perf_step: f32,
    /// Thumbnail top-left, relative to the panel.
    pub thumb_offset: (f32, f32),
    pub thumb_size: f32,
    pub thumb_radius: f32,
    pub title_size: f32,
    pub title_line_height: f32,
    /// Gap between the thumbnail and the title column.
    pub title_gap: f32,
    pub title_right_pad: f32,
    /// Panel-relative baseline of the first title line.
    pub title_first_baseline: f32,
    pub meta_size: f32,
    /// Gap between the last title baseline and the meta line.
    pub meta_gap: f32,
    pub pill_size: (f32, f32),
    /// How far above panel mid-height the pill top sits.
    pub pill_raise: f32,
    pub pill_label_size: f32,
    pub trophy_size: f32,
    pub trophy_gap: f32,
    /// Hero value baseline, measured up from the panel bottom.
    pub hero_baseline_rise: f32,
    pub hero_left_inset: f32,
    pub hero_right_inset: f32,
    /// Label baseline, measured up from the hero value baseline.
    pub hero_label_rise: f32,
    pub label_size: f32,
    pub value_size: f32,
    pub icon_size: f32,
    /// Icon left edge, measured back from the value column.
    pub icon_back: f32,
    pub icon_rise: f32,
    pub arrow_size: f32,
    pub footer_size: f32,
    pub footer_inset: f32,
    pub footer_rise: f32,
}

impl Layout {
    pub const WIDESCREEN: Layout = Layout {
        canvas_w: 1920,
        canvas_h: 1080,
        margin: 60.0,
        card_radius: 40.0,
        logo_offset: (40.0, 30.0),
        logo_width: 200.0,
        panel_inset: 30.0,
        panel_top: 120.0,
        panel_bottom_gap: 60.0,
        panel_radius: 30.0,
        perf_radius: 12.0,
        perf_step: 30.0,
        thumb_offset: (50.0, 40.0),
        thumb_size: 180.0,
        thumb_radius: 20.0,
        title_size: 54.0,
        title_line_height: 65.0,
        title_gap: 40.0,
        title_right_pad: 150.0,
        title_first_baseline: 70.0,
        meta_size: 36.0,
        meta_gap: 56.0,
        pill_size: (200.0, 70.0),
        pill_raise: 20.0,
        pill_label_size: 40.0,
        trophy_size: 56.0,
        trophy_gap: 20.0,
        hero_baseline_rise: 100.0,
        hero_left_inset: 200.0,
        hero_right_inset: 450.0,
        hero_label_rise: 50.0,
        label_size: 32.0,
        value_size: 48.0,
        icon_size: 50.0,
        icon_back: 60.0,
        icon_rise: 40.0,
        arrow_size: 48.0,
        footer_size: 28.0,
        footer_inset: 50.0,
        footer_rise: 28.0,
    };

    pub const SQUARE: Layout = Layout {
        canvas_w: 1080,
        canvas_h: 1080,
        margin: 50.0,
        card_radius: 36.0,
        logo_offset: (36.0, 26.0),
        logo_width: 170.0,
        panel_inset: 26.0,
        panel_top: 110.0,
        panel_bottom_gap: 56.0,
        panel_radius: 26.0,
        perf_radius: 10.0,
        perf_step: 26.0,
        thumb_offset: (40.0, 36.0),
        thumb_size: 150.0,
        thumb_radius: 18.0,
        title_size: 44.0,
        title_line_height: 54.0,
        title_gap: 36.0,
        title_right_pad: 120.0,
        title_first_baseline: 64.0,
        meta_size: 30.0,
        meta_gap: 48.0,
        pill_size: (180.0, 60.0),
        pill_raise: 18.0,
        pill_label_size: 34.0,
        trophy_size: 48.0,
        trophy_gap: 16.0,
        hero_baseline_rise: 90.0,
        hero_left_inset: 150.0,
        hero_right_inset: 400.0,
        hero_label_rise: 44.0,
        label_size: 28.0,
        value_size: 42.0,
        icon_size: 44.0,
        icon_back: 54.0,
        icon_rise: 36.0,
        arrow_size: 42.0,
        footer_size: 24.0,
        footer_inset: 40.0,
        footer_rise: 26.0,
    };

    pub fn for_size(size: SlipSize) -> Layout {
        match size {
            SlipSize::Widescreen => Layout::WIDESCREEN,
            SlipSize::Square => Layout::SQUARE,
        }
    }

    pub fn card(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            self.canvas_w as f32 - self.margin * 2.0,
            self.canvas_h as f32 - self.margin * 2.0,
        )
    }

    pub fn panel(&self) -> Rect {
        let card = self.card();
        Rect::new(
            card.x + self.panel_inset,
            card.y + self.panel_top,
            card.w - self.panel_inset * 2.0,
            card.h - self.panel_top - self.panel_inset - self.panel_bottom_gap,
        )
    }

    pub fn logo_origin(&self) -> (f32, f32) {
        let card = self.card();
        (card.x + self.logo_offset.0, card.y + self.logo_offset.1)
    }

    pub fn thumb(&self) -> Rect {
        let panel = self.panel();
        Rect::new(
            panel.x + self.thumb_offset.0,
            panel.y + self.thumb_offset.1,
            self.thumb_size,
            self.thumb_size,
        )
    }

    /// Baseline origin of the first title line.
    pub fn title_origin(&self) -> (f32, f32) {
        let panel = self.panel();
        (
            self.thumb().right() + self.title_gap,
            panel.y + self.title_first_baseline,
        )
    }

    pub fn title_max_width(&self) -> f32 {
        self.panel().w - self.thumb_size - self.title_right_pad
    }

    pub fn pill(&self) -> Rect {
        let panel = self.panel();
        let (w, h) = self.pill_size;
        Rect::new(
            panel.x + (panel.w - w) / 2.0,
            panel.y + panel.h / 2.0 - self.pill_raise,
            w,
            h,
        )
    }

    pub fn hero_baseline(&self) -> f32 {
        let panel = self.panel();
        panel.bottom() - self.hero_baseline_rise
    }

    pub fn hero_left_x(&self) -> f32 {
        self.panel().x + self.hero_left_inset
    }

    pub fn hero_right_x(&self) -> f32 {
        let panel = self.panel();
        panel.right() - self.hero_right_inset
    }

    pub fn footer_baseline(&self) -> f32 {
        self.panel().bottom() - self.footer_rise
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        let card = self.card();
        if card.w <= 0.0 || card.h <= 0.0 {
            return Err(ThemeError::CanvasTooSmall(
                self.canvas_w,
                self.canvas_h,
                self.margin,
            ));
        }
        let width = self.title_max_width();
        if width <= 0.0 {
            return Err(ThemeError::NoTitleSpace(width));
        }
        let panel = self.panel();
        let (pw, ph) = self.pill_size;
        if pw > panel.w || ph > panel.h {
            return Err(ThemeError::PillTooLarge(pw, ph));
        }
        if self.hero_left_x() >= self.hero_right_x() {
            return Err(ThemeError::HeroColumnsCross);
        }
        Ok(())
    }
}

/// Colors and banner style shared by both size presets.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipTheme {
    pub background: Color,
    /// Card face behind the banner content.
    pub card: Color,
    pub panel: Color,
    pub text: Color,
    pub muted: Color,
    pub positive: Color,
    pub placeholder: Color,
    pub pill_text: Color,
    pub status_won: Color,
    pub status_lost: Color,
    pub status_pending: Color,
    pub trophy: Color,
    pub confetti: [Color; 5],
    pub banner: BannerStyle,
    pub wide: Layout,
    pub square: Layout,
}

impl Default for SlipTheme {
    fn default() -> Self {
        Self {
            background: Color::MIDNIGHT,
            card: Color::SKY,
            panel: Color::MIDNIGHT,
            text: Color::SNOW,
            muted: Color::ASH,
            positive: Color::MEADOW,
            placeholder: Color::SLATE,
            pill_text: Color::MIDNIGHT,
            status_won: Color::MEADOW,
            status_lost: Color::CHERRY,
            status_pending: Color::EMBER,
            trophy: Color::GOLD,
            confetti: [
                Color::SKY,
                Color::EMBER,
                Color::MEADOW,
                Color::SNOW,
                Color::VIOLET,
            ],
            banner: BannerStyle::default(),
            wide: Layout::WIDESCREEN,
            square: Layout::SQUARE,
        }
    }
}

impl SlipTheme {
    pub fn layout(&self, size: SlipSize) -> &Layout {
        match size {
            SlipSize::Widescreen => &self.wide,
            SlipSize::Square => &self.square,
        }
    }

    pub fn status_color(&self, status: SlipStatus) -> Color {
        match status {
            SlipStatus::Won => self.status_won,
            SlipStatus::Lost => self.status_lost,
            SlipStatus::Pending => self.status_pending,
        }
    }

    /// Pill fill: the record's override when set, else the status palette.
    pub fn pill_fill(&self, record: &SlipRecord) -> Color {
        record
            .pill_color
            .unwrap_or_else(|| self.status_color(record.status))
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if let BannerStyle::Confetti { count, .. } = self.banner {
            if count == 0 || count > 10_000 {
                return Err(ThemeError::ConfettiCount(count));
            }
        }
        self.wide.validate()?;
        self.square.validate()?;
        Ok(())
    }
}

/// Theme and layout validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThemeError {
    #[error("canvas {0}x{1} leaves no card area at margin {2}")]
    CanvasTooSmall(u32, u32, f32),

    #[error("title area has no horizontal space ({0})")]
    NoTitleSpace(f32),

    #[error("pill {0}x{1} does not fit the content panel")]
    PillTooLarge(f32, f32),

    #[error("hero columns overlap")]
    HeroColumnsCross,

    #[error("confetti count {0} out of range 1..=10000")]
    ConfettiCount(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_validates() {
        SlipTheme::default().validate().unwrap();
    }

    #[test]
    fn test_layout_matches_size_preset() {
        for size in [SlipSize::Widescreen, SlipSize::Square] {
            let layout = Layout::for_size(size);
            assert_eq!((layout.canvas_w, layout.canvas_h), size.dimensions());
            layout.validate().unwrap();
        }
    }

    #[test]
    fn test_pill_is_horizontally_centered() {
        for layout in [Layout::WIDESCREEN, Layout::SQUARE] {
            let (cx, _) = layout.pill().center();
            assert!((cx - layout.canvas_w as f32 / 2.0).abs() < 0.5);
        }
    }

    #[test]
    fn test_regions_stay_inside_panel() {
        for layout in [Layout::WIDESCREEN, Layout::SQUARE] {
            let panel = layout.panel();
            let thumb = layout.thumb();
            assert!(thumb.right() <= panel.right());
            assert!(thumb.bottom() <= panel.bottom());
            let pill = layout.pill();
            assert!(pill.y >= panel.y && pill.bottom() <= panel.bottom());
            assert!(layout.hero_baseline() < panel.bottom());
            assert!(layout.footer_baseline() < panel.bottom());
        }
    }

    #[test]
    fn test_validate_rejects_oversized_margin() {
        let cramped = Layout {
            margin: 400.0,
            ..Layout::SQUARE
        };
        assert!(matches!(
            cramped.validate(),
            Err(ThemeError::NoTitleSpace(_))
        ));

        let gone = Layout {
            margin: 600.0,
            ..Layout::SQUARE
        };
        assert!(matches!(
            gone.validate(),
            Err(ThemeError::CanvasTooSmall(..))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_confetti() {
        let theme = SlipTheme {
            banner: BannerStyle::Confetti { count: 0, seed: 7 },
            ..SlipTheme::default()
        };
        assert_eq!(theme.validate(), Err(ThemeError::ConfettiCount(0)));
    }

    #[test]
    fn test_status_palette() {
        let theme = SlipTheme::default();
        assert_eq!(theme.status_color(SlipStatus::Won), Color::MEADOW);
        assert_eq!(theme.status_color(SlipStatus::Lost), Color::CHERRY);
        assert_eq!(theme.status_color(SlipStatus::Pending), Color::EMBER);
    }

    #[test]
    fn test_pill_fill_override() {
        let theme = SlipTheme::default();
        let mut record = SlipRecord::default();
        assert_eq!(theme.pill_fill(&record), Color::MEADOW);
        record.pill_color = Some(Color::VIOLET);
        assert_eq!(theme.pill_fill(&record), Color::VIOLET);
    }
}
