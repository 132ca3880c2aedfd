pub mod batch;
pub mod config;
pub mod enhance;
pub mod filter;
pub mod histogram;
pub mod info;
pub mod presets;
pub mod preview;
pub mod reduce_stars;

use std::path::Path;

use anyhow::{Context, Result};
use astroslide_core::frame::PixelGrid;
use astroslide_core::io::{load_rgb, save_rgb};
use astroslide_core::pipeline::OutputFormat;

pub(crate) fn load(path: &Path) -> Result<PixelGrid> {
    load_rgb(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// Write `grid`, using `format` or the encoding implied by the extension.
pub(crate) fn save(grid: &PixelGrid, path: &Path, format: Option<OutputFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_path(path).with_context(|| {
            format!("Cannot pick an encoding for {}; pass --format", path.display())
        })?,
    };
    save_rgb(grid, path, format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved to {}", path.display());
    Ok(())
}
