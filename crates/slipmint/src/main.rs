//! Slipmint - Bet Slip Receipt Generator
//!
//! Command-line entry point: assembles a slip record from a spec file
//! and flag overrides, loads the bitmap assets, renders the receipt and
//! writes the PNG, optionally placing it on the system clipboard.

use anyhow::{Context, Result};
use clap::Parser;
use slipmint_assets::{load_assets, load_market_image, AssetPaths, SlipAssets};
use slipmint_core::{
    ArtFit, BannerStyle, Color, ColorParseError, SlipSize, SlipSpec, SlipStatus, SlipTheme,
};
use slipmint_export::{copy_to_clipboard, write_png};
use slipmint_render::{render_slip, Canvas, FontFace};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Render a bet-slip receipt image")]
struct Cli {
    /// Slip spec file (.toml or .json); flags below override its fields
    #[arg(long)]
    slip: Option<PathBuf>,

    /// Market question headline
    #[arg(long)]
    title: Option<String>,

    /// Bet status: won, lost or pending
    #[arg(long)]
    status: Option<SlipStatus>,

    /// Free-text pill label overriding the status text
    #[arg(long)]
    side_label: Option<String>,

    /// Pill fill: orange, green, blue, red, purple or a hex color
    #[arg(long, value_parser = parse_pill_color)]
    pill_color: Option<Color>,

    /// Displayed odds, e.g. "-145"
    #[arg(long)]
    odds: Option<String>,

    /// Bet type shown next to the odds, e.g. "Moneyline"
    #[arg(long)]
    bet_type: Option<String>,

    /// Amount placed (display string, drawn verbatim)
    #[arg(long)]
    amount: Option<String>,

    /// Amount to win (display string, drawn verbatim)
    #[arg(long)]
    paid: Option<String>,

    /// Bet identifier; generated when absent
    #[arg(long)]
    bet_id: Option<String>,

    /// Placement date; today when absent
    #[arg(long)]
    date: Option<String>,

    /// Canvas preset: widescreen or square
    #[arg(long)]
    size: Option<SlipSize>,

    /// Market thumbnail image
    #[arg(long)]
    market_image: Option<PathBuf>,

    /// Directory holding the banner/logo/cash bitmaps; synthesized
    /// placeholder art is used when omitted
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Banner style; defaults to art when banner art exists, else confetti
    #[arg(long, value_enum)]
    banner: Option<BannerKind>,

    /// How banner art fills the card
    #[arg(long, value_enum, default_value_t = FitKind::Cover)]
    fit: FitKind,

    /// Confetti seed
    #[arg(long, default_value_t = 7)]
    seed: u32,

    /// Confetti particle count
    #[arg(long, default_value_t = 160)]
    confetti_count: u32,

    /// TTF/OTF font file; falls back to a system font, then the builtin face
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output directory for the PNG
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Also place the PNG on the system clipboard
    #[arg(long)]
    copy: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum BannerKind {
    Art,
    Confetti,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum FitKind {
    Cover,
    Stretch,
}

/// Named presets matching the pill color picker, plus raw hex.
fn parse_pill_color(s: &str) -> Result<Color, ColorParseError> {
    match s.to_ascii_lowercase().as_str() {
        "orange" => Ok(Color::EMBER),
        "green" => Ok(Color::MEADOW),
        "blue" => Ok(Color::SKY),
        "red" => Ok(Color::CHERRY),
        "purple" => Ok(Color::VIOLET),
        _ => s.parse(),
    }
}

/// Flags win over spec-file fields.
fn apply_overrides(spec: &mut SlipSpec, cli: &Cli) {
    if cli.title.is_some() {
        spec.market_question = cli.title.clone();
    }
    if cli.status.is_some() {
        spec.status = cli.status;
    }
    if cli.side_label.is_some() {
        spec.side_label = cli.side_label.clone();
    }
    if cli.pill_color.is_some() {
        spec.pill_color = cli.pill_color;
    }
    if cli.odds.is_some() {
        spec.odds = cli.odds.clone();
    }
    if cli.bet_type.is_some() {
        spec.bet_type = cli.bet_type.clone();
    }
    if cli.amount.is_some() {
        spec.amount = cli.amount.clone();
    }
    if cli.paid.is_some() {
        spec.paid = cli.paid.clone();
    }
    if cli.bet_id.is_some() {
        spec.bet_id = cli.bet_id.clone();
    }
    if cli.date.is_some() {
        spec.date_placed = cli.date.clone();
    }
    if cli.size.is_some() {
        spec.size = cli.size;
    }
    if cli.market_image.is_some() {
        spec.market_image = cli.market_image.clone();
    }
}

fn pick_banner(cli: &Cli, has_art: bool) -> BannerStyle {
    let kind = cli.banner.unwrap_or(if has_art {
        BannerKind::Art
    } else {
        BannerKind::Confetti
    });
    match kind {
        BannerKind::Art if has_art => BannerStyle::Art {
            fit: match cli.fit {
                FitKind::Cover => ArtFit::Cover,
                FitKind::Stretch => ArtFit::Stretch,
            },
        },
        BannerKind::Art => {
            warn!("banner art requested but none available, using confetti");
            BannerStyle::Confetti {
                count: cli.confetti_count,
                seed: cli.seed,
            }
        }
        BannerKind::Confetti => BannerStyle::Confetti {
            count: cli.confetti_count,
            seed: cli.seed,
        },
    }
}

fn find_asset(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["png", "jpg", "jpeg"]
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.exists())
}

async fn resolve_assets(cli: &Cli) -> Result<SlipAssets> {
    match &cli.assets_dir {
        Some(dir) => {
            let logo = find_asset(dir, "logo")
                .with_context(|| format!("no logo image in {}", dir.display()))?;
            let cash_icon = find_asset(dir, "cash")
                .with_context(|| format!("no cash icon in {}", dir.display()))?;
            let paths = AssetPaths {
                banner_art: find_asset(dir, "banner"),
                logo,
                cash_icon,
            };
            Ok(load_assets(&paths).await?)
        }
        None => {
            info!("no assets dir given, using synthesized placeholder art");
            Ok(SlipAssets::placeholder())
        }
    }
}

fn resolve_font(cli: &Cli) -> Result<FontFace> {
    if let Some(path) = &cli.font {
        return FontFace::from_path(path)
            .with_context(|| format!("failed to load font {}", path.display()));
    }
    Ok(FontFace::find_system().unwrap_or_else(|| {
        info!("no system font found, using builtin bitmap face");
        FontFace::builtin()
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut spec = match &cli.slip {
        Some(path) => SlipSpec::from_path(path)
            .with_context(|| format!("failed to load slip spec {}", path.display()))?,
        None => SlipSpec::default(),
    };
    apply_overrides(&mut spec, &cli);
    let market_path = spec.market_image.take();
    let record = spec.into_record();

    let mut assets = resolve_assets(&cli).await?;
    if let Some(path) = &market_path {
        let img = load_market_image(path)
            .await
            .with_context(|| format!("failed to load market image {}", path.display()))?;
        assets = assets.with_market_image(img);
    }

    let theme = SlipTheme {
        banner: pick_banner(&cli, assets.banner_art.is_some()),
        ..SlipTheme::default()
    };
    theme.validate().context("theme configuration invalid")?;

    let font = resolve_font(&cli)?;
    let mut canvas = Canvas::new(1, 1);
    render_slip(&mut canvas, &record, &theme, &assets, &font);
    let image = canvas.into_image();

    let path = write_png(&image, &cli.out, &record.bet_id)?;
    info!("slip {} ready at {}", record.bet_id, path.display());

    if cli.copy {
        match copy_to_clipboard(&image) {
            Ok(()) => info!("slip copied to the clipboard"),
            Err(e) => warn!("clipboard copy failed: {e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("slipmint").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_spec() {
        let mut spec = SlipSpec {
            market_question: Some("from file".into()),
            odds: Some("+100".into()),
            ..SlipSpec::default()
        };
        let cli = cli(&["--title", "from flag", "--status", "lost", "--size", "square"]);
        apply_overrides(&mut spec, &cli);
        let record = spec.into_record();
        assert_eq!(record.market_question, "from flag");
        assert_eq!(record.status, SlipStatus::Lost);
        assert_eq!(record.odds, "+100");
        assert_eq!(record.size, SlipSize::Square);
    }

    #[test]
    fn test_pill_color_presets_and_hex() {
        assert_eq!(parse_pill_color("orange").unwrap(), Color::EMBER);
        assert_eq!(parse_pill_color("PURPLE").unwrap(), Color::VIOLET);
        assert_eq!(parse_pill_color("#ef4444").unwrap(), Color::CHERRY);
        assert!(parse_pill_color("chartreuse").is_err());
    }

    #[test]
    fn test_banner_defaults_follow_art_presence() {
        let plain = cli(&[]);
        assert_eq!(
            pick_banner(&plain, true),
            BannerStyle::Art { fit: ArtFit::Cover }
        );
        assert!(matches!(
            pick_banner(&plain, false),
            BannerStyle::Confetti { .. }
        ));

        let forced = cli(&["--banner", "confetti", "--seed", "3", "--confetti-count", "50"]);
        assert_eq!(
            pick_banner(&forced, true),
            BannerStyle::Confetti { count: 50, seed: 3 }
        );

        let stretch = cli(&["--banner", "art", "--fit", "stretch"]);
        assert_eq!(
            pick_banner(&stretch, true),
            BannerStyle::Art {
                fit: ArtFit::Stretch
            }
        );
    }
}
