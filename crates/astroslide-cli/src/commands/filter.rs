use std::path::PathBuf;

use anyhow::{Context, Result};
use astroslide_core::adjust::{
    asinh_stretch, auto_white_balance, background_protected_saturation,
    extract_background_gradient, scnr_green_removal, WhiteBalanceMethod,
};
use astroslide_core::blend::apply_with_star_protection;
use astroslide_core::denoise::{adaptive_denoise, astro_denoise, wavelet_denoise};
use astroslide_core::detection::create_star_mask;
use astroslide_core::pipeline::OutputFormat;
use astroslide_core::stars::{add_star_spikes, remove_stars_inpaint, InpaintMethod, SpikeParams};
use clap::Args;

#[derive(Args)]
pub struct FilterArgs {
    /// Input image
    pub file: PathBuf,

    /// Automatic white balance: gray_world or white_patch
    #[arg(long)]
    pub white_balance: Option<WhiteBalanceMethod>,

    /// Remove background gradients using an NxN sample grid (e.g. 8)
    #[arg(long)]
    pub gradient: Option<usize>,

    /// Also write the fitted background model here
    #[arg(long, requires = "gradient")]
    pub background: Option<PathBuf>,

    /// SCNR green removal amount (0.0-1.0)
    #[arg(long)]
    pub scnr: Option<f32>,

    /// Restore luminance after SCNR
    #[arg(long, requires = "scnr")]
    pub preserve_lightness: bool,

    /// Asinh stretch: "factor,black_point" (e.g. "5.0,0.0")
    #[arg(long)]
    pub asinh: Option<String>,

    /// Noise-adaptive non-local means, base strength (e.g. 10)
    #[arg(long)]
    pub adaptive_denoise: Option<f32>,

    /// Wavelet shrinkage denoise strength (e.g. 0.8)
    #[arg(long)]
    pub wavelet_denoise: Option<f32>,

    /// Use the universal threshold instead of per-layer BayesShrink
    #[arg(long, requires = "wavelet_denoise")]
    pub aggressive: bool,

    /// Star- and edge-aware astro denoise strength (e.g. 0.8)
    #[arg(long)]
    pub astro_denoise: Option<f32>,

    /// Saturation boost sparing the background: "boost,threshold" (e.g. "1.3,0.15")
    #[arg(long)]
    pub protected_saturation: Option<String>,

    /// Remove stars by inpainting: telea or ns
    #[arg(long)]
    pub remove_stars: Option<InpaintMethod>,

    /// Keep only this share (0.0-1.0) of the filter steps inside stars
    #[arg(long)]
    pub protect_stars: Option<f32>,

    /// Sigma multiplier for the star mask used by --remove-stars and --protect-stars
    #[arg(long, default_value = "2.0")]
    pub star_threshold: f32,

    /// Inpainting neighborhood radius in pixels
    #[arg(long, default_value = "3")]
    pub inpaint_radius: usize,

    /// Overlay diffraction spikes
    #[arg(long)]
    pub spikes: bool,

    /// Output file path
    #[arg(short, long, default_value = "filtered.png")]
    pub output: PathBuf,

    /// Output encoding; guessed from the output path if omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let original = super::load(&args.file)?;
    let mut grid = original.clone();

    println!("Loaded {}x{} image", grid.width(), grid.height());

    if let Some(method) = args.white_balance {
        println!("Applying white balance: {}", method);
        grid = auto_white_balance(&grid, method);
    }

    if let Some(cells) = args.gradient {
        println!("Extracting background gradient: {}x{} grid", cells, cells);
        let (corrected, model) = extract_background_gradient(&grid, cells);
        if let Some(ref path) = args.background {
            super::save(&model, path, None)?;
        }
        grid = corrected;
    }

    if let Some(amount) = args.scnr {
        println!(
            "Applying SCNR: amount={}, preserve_lightness={}",
            amount, args.preserve_lightness
        );
        grid = scnr_green_removal(&grid, amount, args.preserve_lightness);
    }

    if let Some(ref asinh_str) = args.asinh {
        let parts = parse_floats(asinh_str)
            .context("Invalid asinh format (expected 'factor,black_point')")?;
        if parts.len() != 2 {
            anyhow::bail!("Asinh stretch requires exactly 2 values: factor,black_point");
        }
        println!(
            "Applying asinh stretch: factor={}, black_point={}",
            parts[0], parts[1]
        );
        grid = asinh_stretch(&grid, parts[0], parts[1]);
    }

    if let Some(strength) = args.adaptive_denoise {
        println!("Applying adaptive denoise: base strength={}", strength);
        grid = adaptive_denoise(&grid, strength);
    }

    if let Some(strength) = args.wavelet_denoise {
        println!(
            "Applying wavelet denoise: strength={}, preserve_details={}",
            strength, !args.aggressive
        );
        grid = wavelet_denoise(&grid, strength, !args.aggressive);
    }

    if let Some(strength) = args.astro_denoise {
        println!("Applying astro denoise: strength={}", strength);
        grid = astro_denoise(&grid, strength, true, true);
    }

    if let Some(ref sat_str) = args.protected_saturation {
        let parts = parse_floats(sat_str)
            .context("Invalid saturation format (expected 'boost,threshold')")?;
        if parts.len() != 2 {
            anyhow::bail!("Protected saturation requires exactly 2 values: boost,threshold");
        }
        println!(
            "Applying protected saturation: boost={}, threshold={}",
            parts[0], parts[1]
        );
        grid = background_protected_saturation(&grid, parts[0], parts[1]);
    }

    if let Some(method) = args.remove_stars {
        let mask = create_star_mask(&grid, args.star_threshold);
        println!(
            "Removing stars: method={}, radius={}",
            method, args.inpaint_radius
        );
        grid = remove_stars_inpaint(&grid, &mask, method, args.inpaint_radius);
    }

    if let Some(blend) = args.protect_stars {
        let mask = create_star_mask(&original, args.star_threshold);
        println!("Protecting stars: blend={}", blend);
        grid = apply_with_star_protection(&original, &grid, &mask, blend);
    }

    if args.spikes {
        println!("Adding diffraction spikes");
        grid = add_star_spikes(&grid, &SpikeParams::default());
    }

    super::save(&grid, &args.output, args.format)
}

fn parse_floats(s: &str) -> std::result::Result<Vec<f32>, std::num::ParseFloatError> {
    s.split(',').map(|p| p.trim().parse::<f32>()).collect()
}
