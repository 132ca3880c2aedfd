use std::path::PathBuf;

use anyhow::Result;
use astroslide_core::pipeline::{reduce_stars_standalone, OutputFormat};
use clap::Args;

#[derive(Args)]
pub struct ReduceStarsArgs {
    /// Input image
    pub file: PathBuf,

    /// Reduction strength (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    pub amount: f32,

    /// Output file path
    #[arg(short, long, default_value = "reduced.png")]
    pub output: PathBuf,

    /// Output encoding; guessed from the output path if omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: &ReduceStarsArgs) -> Result<()> {
    let grid = super::load(&args.file)?;
    println!("Loaded {}x{} image", grid.width(), grid.height());
    println!("Reducing stars: amount={}", args.amount);
    let reduced = reduce_stars_standalone(&grid, Some(args.amount));
    super::save(&reduced, &args.output, args.format)
}
