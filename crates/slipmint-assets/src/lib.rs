//! Slipmint Assets - Bitmap Loading
//!
//! Decodes the image files a slip render needs, as one fail-fast batch.
//! Also synthesizes deterministic placeholder art for asset-less runs.

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the required bitmaps live on disk.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// Banner art behind the card. Optional; confetti banners need none.
    pub banner_art: Option<PathBuf>,
    pub logo: PathBuf,
    pub cash_icon: PathBuf,
}

/// The decoded bitmap set one render consumes. Logo and cash icon are
/// unconditionally required; the renderer never runs without them.
#[derive(Debug, Clone)]
pub struct SlipAssets {
    pub banner_art: Option<RgbaImage>,
    pub logo: RgbaImage,
    pub cash_icon: RgbaImage,
    pub market_image: Option<RgbaImage>,
}

/// Asset loading and decoding errors. Any one of these fails the batch.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode asset {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("asset decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

async fn decode_file(path: PathBuf) -> Result<RgbaImage, AssetError> {
    tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: path.clone(),
            source,
        })?;
        debug!("decoded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img.to_rgba8())
    })
    .await?
}

/// Decode every configured bitmap, all-or-nothing. The first read or
/// decode error fails the whole batch; there is no fallback image.
pub async fn load_assets(paths: &AssetPaths) -> Result<SlipAssets, AssetError> {
    let banner = async {
        match &paths.banner_art {
            Some(p) => decode_file(p.clone()).await.map(Some),
            None => Ok(None),
        }
    };
    let (banner_art, logo, cash_icon) = tokio::try_join!(
        banner,
        decode_file(paths.logo.clone()),
        decode_file(paths.cash_icon.clone()),
    )?;
    info!(
        "asset batch ready (banner art: {})",
        if banner_art.is_some() { "yes" } else { "no" }
    );
    Ok(SlipAssets {
        banner_art,
        logo,
        cash_icon,
        market_image: None,
    })
}

/// Decode the optional market thumbnail. Loaded independently of the
/// batch; absence is represented by the caller keeping `None`.
pub async fn load_market_image(path: &Path) -> Result<RgbaImage, AssetError> {
    decode_file(path.to_path_buf()).await
}

impl SlipAssets {
    /// Deterministic synthesized stand-in art for demo and test renders.
    /// This is an explicit mode, never a fallback for a failed load.
    pub fn placeholder() -> Self {
        debug!("synthesizing placeholder assets");
        Self {
            banner_art: Some(placeholder_banner()),
            logo: placeholder_logo(),
            cash_icon: placeholder_cash_icon(),
            market_image: None,
        }
    }

    pub fn with_market_image(mut self, img: RgbaImage) -> Self {
        self.market_image = Some(img);
        self
    }
}

fn mix(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [ch(a[0], b[0]), ch(a[1], b[1]), ch(a[2], b[2])]
}

/// Deep-blue gradient with diagonal light streaks.
fn placeholder_banner() -> RgbaImage {
    const TOP: [u8; 3] = [0x0c, 0x4a, 0x6e];
    const BOTTOM: [u8; 3] = [0x38, 0xbd, 0xf8];
    let (w, h) = (1600u32, 900u32);
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        let base = mix(TOP, BOTTOM, y as f32 / (h - 1) as f32);
        for x in 0..w {
            let streak = (x + y * 2) % 360 < 28;
            let [r, g, b] = if streak {
                mix(base, [0xf8, 0xfa, 0xfc], 0.18)
            } else {
                base
            };
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
    img
}

/// Light rounded wordmark tile with a sky accent disc and text bars.
fn placeholder_logo() -> RgbaImage {
    const FACE: [u8; 3] = [0xf8, 0xfa, 0xfc];
    const ACCENT: [u8; 3] = [0x38, 0xbd, 0xf8];
    const INK: [u8; 3] = [0x02, 0x06, 0x17];
    let (w, h) = (420u32, 120u32);
    let radius = 28.0f32;
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let dx = (radius - px).max(px - (w as f32 - radius)).max(0.0);
            let dy = (radius - py).max(py - (h as f32 - radius)).max(0.0);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let dcx = px - 60.0;
            let dcy = py - 60.0;
            let in_disc = dcx * dcx + dcy * dcy <= 34.0 * 34.0;
            let in_bar = (120..380).contains(&x)
                && matches!(y, 34..=44 | 54..=64 | 74..=84);
            let [r, g, b] = if in_disc {
                ACCENT
            } else if in_bar {
                INK
            } else {
                FACE
            };
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
    img
}

/// Gold coin: dark rim, gold body, pale center.
fn placeholder_cash_icon() -> RgbaImage {
    const RIM: [u8; 3] = [0xd9, 0x77, 0x06];
    const BODY: [u8; 3] = [0xfb, 0xbf, 0x24];
    const CENTER: [u8; 3] = [0xfd, 0xe6, 0x8a];
    let side = 96u32;
    let c = side as f32 / 2.0;
    let mut img = RgbaImage::new(side, side);
    for y in 0..side {
        for x in 0..side {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            let d2 = dx * dx + dy * dy;
            let [r, g, b] = if d2 <= 26.0 * 26.0 {
                CENTER
            } else if d2 <= 40.0 * 40.0 {
                BODY
            } else if d2 <= 46.0 * 46.0 {
                RIM
            } else {
                continue;
            };
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
    img
}
