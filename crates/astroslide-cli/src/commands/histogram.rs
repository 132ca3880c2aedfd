use std::path::PathBuf;

use anyhow::Result;
use astroslide_core::filters::Histogram;
use astroslide_core::pipeline::histogram;
use clap::Args;

#[derive(Args)]
pub struct HistogramArgs {
    /// Input image
    pub file: PathBuf,

    /// Number of rows to group the 256 bins into
    #[arg(long, default_value = "16")]
    pub buckets: usize,
}

pub fn run(args: &HistogramArgs) -> Result<()> {
    let grid = super::load(&args.file)?;
    let hist = histogram(&grid);
    let buckets = args.buckets.clamp(1, 256);
    let width = 256usize.div_ceil(buckets);

    println!(
        "\nHistogram of {} ({}x{}, {} samples per channel):",
        args.file.display(),
        grid.width(),
        grid.height(),
        hist.total()
    );
    println!(
        "{:>9}  {:>10}  {:>10}  {:>10}  {:>10}",
        "Range", "Red", "Green", "Blue", "Luminance"
    );
    println!("{}", "-".repeat(59));

    for start in (0..256).step_by(width) {
        let end = (start + width).min(256);
        println!(
            "{:>4}-{:<4}  {:>10}  {:>10}  {:>10}  {:>10}",
            start,
            end - 1,
            bucket(&hist.red, start, end),
            bucket(&hist.green, start, end),
            bucket(&hist.blue, start, end),
            bucket(&hist.luminance, start, end),
        );
    }

    print_extremes(&hist);
    Ok(())
}

fn bucket(bins: &[u64; 256], start: usize, end: usize) -> u64 {
    bins[start..end].iter().sum()
}

fn print_extremes(hist: &Histogram) {
    let clipped_black = hist.luminance[0];
    let clipped_white = hist.luminance[255];
    let total = hist.total().max(1) as f64;
    println!(
        "\nBlack clipped: {} ({:.2}%)",
        clipped_black,
        clipped_black as f64 / total * 100.0
    );
    println!(
        "White clipped: {} ({:.2}%)",
        clipped_white,
        clipped_white as f64 / total * 100.0
    );
}
