use std::path::PathBuf;

use anyhow::Result;
use astroslide_core::pipeline::{preview, OutputFormat};
use clap::Args;

#[derive(Args)]
pub struct PreviewArgs {
    /// Input image
    pub file: PathBuf,

    /// Preset identifier
    #[arg(short, long, default_value = "general")]
    pub preset: String,

    /// Output file path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,

    /// Output encoding; guessed from the output path if omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let grid = super::load(&args.file)?;
    let small = preview(&grid, &args.preset)?;
    println!(
        "Preview {}x{} -> {}x{} ({})",
        grid.width(),
        grid.height(),
        small.width(),
        small.height(),
        args.preset
    );
    super::save(&small, &args.output, args.format)
}
