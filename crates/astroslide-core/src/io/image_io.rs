use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tiff::encoder::{colortype, compression::Lzw, TiffEncoder};
use tracing::debug;

use crate::consts::{JPEG_QUALITY, MAX_INPUT_BYTES};
use crate::error::{AstroError, Result};
use crate::frame::PixelGrid;
use crate::pipeline::OutputFormat;

use super::fits::{decode_fits_bytes, read_fits};

/// File extensions accepted as input.
pub const ACCEPTED_EXTENSIONS: [&str; 8] =
    ["jpg", "jpeg", "png", "tiff", "tif", "fits", "fit", "fts"];

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_fits_name(name: &str) -> bool {
    matches!(extension(name).as_deref(), Some("fits" | "fit" | "fts"))
}

pub fn is_accepted_name(name: &str) -> bool {
    extension(name).is_some_and(|e| ACCEPTED_EXTENSIONS.contains(&e.as_str()))
}

/// Load an image file as 8-bit RGB, dispatching FITS by extension.
pub fn load_rgb(path: &Path) -> Result<PixelGrid> {
    if is_fits_name(&path.to_string_lossy()) {
        return read_fits(path);
    }
    let img = image::open(path)?;
    from_rgb_image(img.to_rgb8())
}

/// Decode an uploaded file held in memory.
///
/// Inputs over 50 MiB are rejected. `filename` only selects the FITS path;
/// other containers are sniffed from their bytes.
pub fn decode_bytes(bytes: &[u8], filename: &str) -> Result<PixelGrid> {
    if bytes.len() > MAX_INPUT_BYTES {
        return Err(AstroError::TooLarge {
            size: bytes.len(),
            limit: MAX_INPUT_BYTES,
        });
    }
    if is_fits_name(filename) {
        return decode_fits_bytes(bytes);
    }
    let img = image::load_from_memory(bytes)?;
    from_rgb_image(img.to_rgb8())
}

pub fn from_rgb_image(img: RgbImage) -> Result<PixelGrid> {
    let (w, h) = img.dimensions();
    PixelGrid::from_raw(w as usize, h as usize, img.into_raw())
}

pub fn to_rgb_image(grid: &PixelGrid) -> Result<RgbImage> {
    RgbImage::from_raw(grid.width() as u32, grid.height() as u32, grid.to_raw()).ok_or(
        AstroError::BufferSizeMismatch {
            expected: grid.width() * grid.height() * 3,
            actual: grid.data().len(),
        },
    )
}

/// Encode a grid into the bytes of `format`.
pub fn encode(grid: &PixelGrid, format: OutputFormat) -> Result<Vec<u8>> {
    let (w, h) = (grid.width() as u32, grid.height() as u32);
    let raw = grid.to_raw();
    let mut buf = Vec::new();

    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).write_image(
                &raw,
                w,
                h,
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Png => {
            PngEncoder::new_with_quality(&mut buf, CompressionType::Default, FilterType::Adaptive)
                .write_image(&raw, w, h, ExtendedColorType::Rgb8)?;
        }
        OutputFormat::Tiff => {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buf))?;
            encoder.write_image_with_compression::<colortype::RGB8, _>(w, h, Lzw, &raw)?;
        }
    }

    debug!(%format, bytes = buf.len(), "Encoded image");
    Ok(buf)
}

/// Encode and write a grid to `path`.
pub fn save_rgb(grid: &PixelGrid, path: &Path, format: OutputFormat) -> Result<()> {
    let bytes = encode(grid, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
