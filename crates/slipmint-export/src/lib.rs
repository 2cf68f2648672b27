//! Slipmint Export - PNG and Clipboard
//!
//! Serializes a rendered slip surface to PNG bytes, writes it to disk
//! under a filename derived from the bet id, and places it on the
//! system clipboard.

use image::{ImageFormat, RgbaImage};
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while exporting a rendered slip.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("clipboard rejected the image: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Encode the surface as a PNG byte stream.
pub fn to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Output filename for a slip, derived from its bet id. Characters that
/// do not belong in a filename are replaced with `-`.
pub fn slip_filename(bet_id: &str) -> String {
    let safe: String = bet_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("slip-{safe}.png")
}

/// Write the slip PNG into `out_dir`, creating it if needed. The file
/// lands under its final name only once fully written.
pub fn write_png(image: &RgbaImage, out_dir: &Path, bet_id: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(slip_filename(bet_id));
    let temp = path.with_extension("tmp");

    let bytes = to_png_bytes(image)?;
    fs::write(&temp, &bytes)?;
    fs::rename(&temp, &path)?;

    info!(path = %path.display(), bytes = bytes.len(), "slip PNG written");
    Ok(path)
}

/// Place the slip on the system clipboard as image data. The host may
/// refuse (headless session, permissions); the caller decides how to
/// report that.
pub fn copy_to_clipboard(image: &RgbaImage) -> Result<(), ExportError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: Cow::Borrowed(image.as_raw()),
    })?;
    info!("slip image placed on the clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slipmint-export-{tag}-{}", std::process::id()))
    }

    #[test]
    fn test_png_roundtrip_solid_fill() {
        let fill = Rgba([2, 6, 23, 255]);
        let surface = RgbaImage::from_pixel(64, 48, fill);
        let bytes = to_png_bytes(&surface).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert!(decoded.pixels().all(|p| *p == fill));
    }

    #[test]
    fn test_filename_derivation() {
        assert_eq!(slip_filename("A1B2C3D4E"), "slip-A1B2C3D4E.png");
        assert_eq!(slip_filename("has space"), "slip-has-space.png");
        assert_eq!(slip_filename("../x"), "slip----x.png");
    }

    #[test]
    fn test_write_png_creates_file() {
        let dir = temp_dir("write");
        let surface = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));

        let path = write_png(&surface, &dir, "TEST123").unwrap();
        assert!(path.ends_with("slip-TEST123.png"));
        let bytes = fs::read(&path).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 8));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_png_leaves_no_temp_file() {
        let dir = temp_dir("tmp");
        let surface = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

        write_png(&surface, &dir, "ABC").unwrap();
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
