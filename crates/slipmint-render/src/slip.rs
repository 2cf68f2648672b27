//! Slip composition
//!
//! One parametrized pass that redraws the whole receipt from a record,
//! a theme and the loaded bitmaps. Every layer is repainted in a fixed
//! order, so rendering twice with different records leaves no residue
//! from the first pass.

use crate::canvas::{Baseline, Canvas, TextAlign};
use crate::confetti::{confetti, ParticleShape};
use crate::layout::wrap_text;
use crate::text::FontFace;
use slipmint_assets::SlipAssets;
use slipmint_core::{ArtFit, BannerStyle, Layout, Rect, SlipRecord, SlipStatus, SlipTheme};
use tracing::{debug, warn};

/// Render the full slip. The canvas is resized to the record's size
/// preset and fully overwritten; the caller is responsible for having
/// loaded `assets` beforehand.
pub fn render_slip(
    canvas: &mut Canvas,
    record: &SlipRecord,
    theme: &SlipTheme,
    assets: &SlipAssets,
    font: &FontFace,
) {
    let layout = theme.layout(record.size);
    canvas.resize(layout.canvas_w, layout.canvas_h);
    canvas.clear(theme.background);

    draw_banner(canvas, theme, layout, assets);
    draw_logo(canvas, layout, assets);
    draw_panel(canvas, theme, layout);
    draw_pill(canvas, record, theme, layout, font);
    draw_thumbnail(canvas, theme, layout, assets);
    draw_title_and_meta(canvas, record, theme, layout, font);
    draw_hero(canvas, record, theme, layout, assets, font);
    draw_footer(canvas, record, theme, layout, font);

    debug!(bet_id = %record.bet_id, size = ?record.size, "slip rendered");
}

/// Card fill plus banner art or confetti, clipped to the card's rounded
/// rect. The content panel later covers all but the top band and the
/// perforation strip.
fn draw_banner(canvas: &mut Canvas, theme: &SlipTheme, layout: &Layout, assets: &SlipAssets) {
    let card = layout.card();
    canvas.save();
    canvas.clip_rounded_rect(card, layout.card_radius);
    canvas.fill_rect(card, theme.card);

    match theme.banner {
        BannerStyle::Art { fit } => match (&assets.banner_art, fit) {
            (Some(art), ArtFit::Cover) => canvas.draw_bitmap_cover(art, card),
            (Some(art), ArtFit::Stretch) => canvas.draw_bitmap_stretch_top(art, card),
            (None, _) => warn!("banner art not loaded, card fill only"),
        },
        BannerStyle::Confetti { count, seed } => {
            let band = Rect::new(card.x, card.y, card.w, layout.panel_top);
            for p in confetti(seed, count, band, theme.confetti.len()) {
                let color = theme.confetti[p.color_index]
                    .with_alpha((p.opacity * 255.0).round() as u8);
                match p.shape {
                    ParticleShape::Disc => {
                        canvas.fill_circle(p.x, p.y, p.size / 2.0, color);
                    }
                    ParticleShape::Quad => {
                        let h = p.size / 2.0;
                        let (sin, cos) = p.rotation.sin_cos();
                        let pts = [(-h, -h), (h, -h), (h, h), (-h, h)]
                            .map(|(dx, dy)| (p.x + dx * cos - dy * sin, p.y + dx * sin + dy * cos));
                        canvas.fill_quad(pts, color);
                    }
                }
            }
        }
    }
    canvas.restore();
}

fn draw_logo(canvas: &mut Canvas, layout: &Layout, assets: &SlipAssets) {
    let logo = &assets.logo;
    if logo.width() == 0 {
        return;
    }
    let (x, y) = layout.logo_origin();
    let w = layout.logo_width;
    let h = logo.height() as f32 / logo.width() as f32 * w;
    canvas.draw_bitmap(logo, Rect::new(x, y, w, h));
}

/// Content panel plus the scalloped ticket edge along its bottom.
fn draw_panel(canvas: &mut Canvas, theme: &SlipTheme, layout: &Layout) {
    let panel = layout.panel();
    canvas.fill_rounded_rect(panel, layout.panel_radius, theme.panel);

    let count = (panel.w / layout.perf_step).floor() as u32;
    if count == 0 {
        return;
    }
    let start = panel.x + (panel.w - (count - 1) as f32 * layout.perf_step) / 2.0;
    let cy = panel.bottom() + layout.perf_radius;
    for i in 0..count {
        let cx = start + i as f32 * layout.perf_step;
        canvas.fill_circle(cx, cy, layout.perf_radius, theme.panel);
    }
}

fn draw_pill(
    canvas: &mut Canvas,
    record: &SlipRecord,
    theme: &SlipTheme,
    layout: &Layout,
    font: &FontFace,
) {
    let pill = layout.pill();
    canvas.fill_rounded_rect(pill, pill.h / 2.0, theme.pill_fill(record));

    canvas.save();
    canvas.set_align(TextAlign::Center);
    canvas.set_baseline(Baseline::Middle);
    let (cx, cy) = pill.center();
    canvas.fill_text(
        font,
        record.pill_label(),
        cx,
        cy,
        layout.pill_label_size,
        theme.pill_text,
    );
    canvas.restore();

    if record.status == SlipStatus::Won {
        draw_trophy(canvas, theme, layout, pill);
    }
}

/// Procedural trophy to the left of the pill: bowl, handles, stem, base.
fn draw_trophy(canvas: &mut Canvas, theme: &SlipTheme, layout: &Layout, pill: Rect) {
    let s = layout.trophy_size;
    let (_, cy) = pill.center();
    let t = Rect::new(pill.x - layout.trophy_gap - s, cy - s / 2.0, s, s);
    let gold = theme.trophy;

    canvas.fill_circle(t.x + s * 0.10, t.y + s * 0.20, s * 0.10, gold);
    canvas.fill_circle(t.x + s * 0.90, t.y + s * 0.20, s * 0.10, gold);
    canvas.fill_rounded_rect(Rect::new(t.x + s * 0.14, t.y, s * 0.72, s * 0.48), s * 0.16, gold);
    canvas.fill_rect(Rect::new(t.x + s * 0.42, t.y + s * 0.48, s * 0.16, s * 0.30), gold);
    canvas.fill_rounded_rect(
        Rect::new(t.x + s * 0.22, t.y + s * 0.78, s * 0.56, s * 0.16),
        s * 0.05,
        gold,
    );
}

fn draw_thumbnail(canvas: &mut Canvas, theme: &SlipTheme, layout: &Layout, assets: &SlipAssets) {
    let thumb = layout.thumb();
    match &assets.market_image {
        Some(img) => {
            canvas.save();
            canvas.clip_rounded_rect(thumb, layout.thumb_radius);
            canvas.draw_bitmap(img, thumb);
            canvas.restore();
        }
        None => canvas.fill_rounded_rect(thumb, layout.thumb_radius, theme.placeholder),
    }
}

fn draw_title_and_meta(
    canvas: &mut Canvas,
    record: &SlipRecord,
    theme: &SlipTheme,
    layout: &Layout,
    font: &FontFace,
) {
    let (x, first) = layout.title_origin();
    let lines = wrap_text(&record.market_question, layout.title_max_width(), |s| {
        font.measure(s, layout.title_size)
    });
    let mut baseline = first;
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            baseline += layout.title_line_height;
        }
        canvas.fill_text(font, line, x, baseline, layout.title_size, theme.text);
    }

    let meta = format!("{} · {}", record.odds, record.bet_type);
    canvas.fill_text(
        font,
        &meta,
        x,
        baseline + layout.meta_gap,
        layout.meta_size,
        theme.muted,
    );
}

fn draw_hero(
    canvas: &mut Canvas,
    record: &SlipRecord,
    theme: &SlipTheme,
    layout: &Layout,
    assets: &SlipAssets,
    font: &FontFace,
) {
    let baseline = layout.hero_baseline();
    let label_y = baseline - layout.hero_label_rise;
    let left = layout.hero_left_x();
    let right = layout.hero_right_x();

    canvas.fill_text(font, "Placed", left, label_y, layout.label_size, theme.muted);
    canvas.fill_text(font, "To Win", right, label_y, layout.label_size, theme.muted);

    for (col, value, color) in [
        (left, &record.amount, theme.text),
        (right, &record.paid, theme.positive),
    ] {
        let icon = Rect::new(
            col - layout.icon_back,
            baseline - layout.icon_rise,
            layout.icon_size,
            layout.icon_size,
        );
        canvas.draw_bitmap(&assets.cash_icon, icon);
        canvas.fill_text(font, value, col, baseline, layout.value_size, color);
    }

    draw_arrow(canvas, theme, layout);
}

/// Directional arrow between the two hero columns.
fn draw_arrow(canvas: &mut Canvas, theme: &SlipTheme, layout: &Layout) {
    let panel = layout.panel();
    let cx = panel.x + panel.w / 2.0;
    let cy = layout.hero_baseline() - layout.value_size * 0.35;
    let s = layout.arrow_size;
    let head = s * 0.4;
    let thick = s * 0.14;

    canvas.fill_rect(
        Rect::new(cx - s / 2.0, cy - thick / 2.0, s - head, thick),
        theme.muted,
    );
    canvas.fill_triangle(
        (cx + s / 2.0 - head, cy - s * 0.25),
        (cx + s / 2.0, cy),
        (cx + s / 2.0 - head, cy + s * 0.25),
        theme.muted,
    );
}

fn draw_footer(
    canvas: &mut Canvas,
    record: &SlipRecord,
    theme: &SlipTheme,
    layout: &Layout,
    font: &FontFace,
) {
    let panel = layout.panel();
    let y = layout.footer_baseline();
    let id = format!("Bet ID: {}", record.bet_id);
    canvas.fill_text(
        font,
        &id,
        panel.x + layout.footer_inset,
        y,
        layout.footer_size,
        theme.muted,
    );

    canvas.save();
    canvas.set_align(TextAlign::Right);
    canvas.fill_text(
        font,
        &record.date_placed,
        panel.right() - layout.footer_inset,
        y,
        layout.footer_size,
        theme.muted,
    );
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipmint_core::{Color, SlipSize};

    fn probe(canvas: &Canvas, x: f32, y: f32) -> Color {
        canvas.pixel(x as u32, y as u32)
    }

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

    fn render_default() -> (Canvas, SlipRecord, SlipTheme) {
        let record = SlipRecord::default();
        let theme = SlipTheme::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(1, 1);
        render_slip(&mut canvas, &record, &theme, &assets, &font);
        (canvas, record, theme)
    }

    #[test]
    fn test_background_and_dimensions() {
        let (canvas, record, theme) = render_default();
        assert_eq!(record.size, SlipSize::Widescreen);
        assert_eq!((canvas.width(), canvas.height()), (1920, 1080));
        // page margin stays pure background
        assert_eq!(canvas.pixel(0, 0), theme.background);
        assert_eq!(canvas.pixel(1919, 1079), theme.background);
    }

    #[test]
    fn test_pill_center_shows_won_fill() {
        let (canvas, record, theme) = render_default();
        assert_eq!(record.status, SlipStatus::Won);
        let (cx, cy) = theme.layout(record.size).pill().center();
        assert_eq!(probe(&canvas, cx, cy), theme.status_won);
    }

    #[test]
    fn test_pill_override_color_and_label() {
        let record = SlipRecord {
            side_label: Some("YES".into()),
            pill_color: Some(Color::EMBER),
            ..SlipRecord::default()
        };
        let theme = SlipTheme::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(1, 1);
        render_slip(&mut canvas, &record, &theme, &assets, &font);
        let (cx, cy) = theme.layout(record.size).pill().center();
        assert_eq!(probe(&canvas, cx, cy), Color::EMBER);
    }

    #[test]
    fn test_odds_text_leaves_ink() {
        let (canvas, record, theme) = render_default();
        assert_eq!(record.odds, "-145");
        let layout = theme.layout(record.size);
        let font = FontFace::builtin();
        let lines = wrap_text(&record.market_question, layout.title_max_width(), |s| {
            font.measure(s, layout.title_size)
        });
        let (x, first) = layout.title_origin();
        let meta_y = first
            + (lines.len() - 1) as f32 * layout.title_line_height
            + layout.meta_gap;
        let strip = Rect::new(x, meta_y - layout.meta_size, 300.0, layout.meta_size + 10.0);
        let ink = ink_count(&canvas, strip, theme.panel);
        assert!(ink > 20, "expected odds ink in the meta strip, found {ink}");
    }

    #[test]
    fn test_trophy_follows_status() {
        let theme = SlipTheme::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();

        let won = SlipRecord::default();
        let layout = theme.layout(won.size);
        let pill = layout.pill();
        let s = layout.trophy_size;
        let stem = (
            pill.x - layout.trophy_gap - s + s * 0.5,
            pill.center().1 - s / 2.0 + s * 0.63,
        );

        let mut canvas = Canvas::new(1, 1);
        render_slip(&mut canvas, &won, &theme, &assets, &font);
        assert_eq!(probe(&canvas, stem.0, stem.1), theme.trophy);

        let lost = SlipRecord {
            status: SlipStatus::Lost,
            ..SlipRecord::default()
        };
        render_slip(&mut canvas, &lost, &theme, &assets, &font);
        assert_eq!(probe(&canvas, stem.0, stem.1), theme.panel);
        let (cx, cy) = pill.center();
        assert_eq!(probe(&canvas, cx, cy), theme.status_lost);
    }

    #[test]
    fn test_rerender_leaves_no_residue() {
        let theme = SlipTheme::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();
        let first = SlipRecord::default();
        let second = SlipRecord {
            market_question: "Will it rain tomorrow in Denver?".into(),
            status: SlipStatus::Pending,
            size: SlipSize::Square,
            ..SlipRecord::default()
        };

        let mut reused = Canvas::new(1, 1);
        render_slip(&mut reused, &first, &theme, &assets, &font);
        render_slip(&mut reused, &second, &theme, &assets, &font);

        let mut fresh = Canvas::new(1, 1);
        render_slip(&mut fresh, &second, &theme, &assets, &font);

        assert_eq!(reused.image().as_raw(), fresh.image().as_raw());
    }

    #[test]
    fn test_confetti_banner_is_deterministic() {
        let theme = SlipTheme {
            banner: BannerStyle::Confetti {
                count: 120,
                seed: 9,
            },
            ..SlipTheme::default()
        };
        let record = SlipRecord::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();

        let mut a = Canvas::new(1, 1);
        render_slip(&mut a, &record, &theme, &assets, &font);
        let mut b = Canvas::new(1, 1);
        render_slip(&mut b, &record, &theme, &assets, &font);
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn test_missing_art_falls_back_to_card_fill() {
        let theme = SlipTheme::default();
        let record = SlipRecord::default();
        let assets = SlipAssets {
            banner_art: None,
            ..SlipAssets::placeholder()
        };
        let font = FontFace::builtin();
        let mut canvas = Canvas::new(1, 1);
        render_slip(&mut canvas, &record, &theme, &assets, &font);

        let card = theme.layout(record.size).card();
        // banner band above the logo-free center shows the plain card fill
        assert_eq!(
            probe(&canvas, card.x + card.w / 2.0, card.y + 40.0),
            theme.card
        );
    }

    #[test]
    fn test_size_switch_changes_dimensions_only() {
        let theme = SlipTheme::default();
        let assets = SlipAssets::placeholder();
        let font = FontFace::builtin();
        let record = SlipRecord {
            size: SlipSize::Square,
            ..SlipRecord::default()
        };
        let mut canvas = Canvas::new(1, 1);
        render_slip(&mut canvas, &record, &theme, &assets, &font);
        assert_eq!((canvas.width(), canvas.height()), (1080, 1080));

        let (cx, cy) = theme.layout(record.size).pill().center();
        assert_eq!(probe(&canvas, cx, cy), theme.status_won);
    }
}
