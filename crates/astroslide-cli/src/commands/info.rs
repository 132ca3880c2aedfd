use std::path::PathBuf;

use anyhow::Result;
use astroslide_core::denoise::estimate_noise_level;
use astroslide_core::detection::{count_stars, create_star_mask};
use astroslide_core::io::is_fits_name;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,

    /// Sigma multiplier for star detection
    #[arg(long, default_value = "2.0")]
    pub star_threshold: f32,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let grid = super::load(&args.file)?;

    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = if is_fits_name(&name) { "FITS" } else { "raster" };

    let noise = estimate_noise_level(&grid);
    let stars = count_stars(&create_star_mask(&grid, args.star_threshold));

    println!("File:        {}", args.file.display());
    println!("Format:      {}", kind);
    println!("Dimensions:  {}x{}", grid.width(), grid.height());
    println!("Noise level: {:.3}", noise);
    println!("Stars:       {}", stars);

    let megapixels = (grid.width() * grid.height()) as f64 / 1_000_000.0;
    println!("Size:        {:.2} MP", megapixels);

    Ok(())
}
