mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astroslide", about = "Astrophotography enhancement tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available enhancement presets
    Presets(commands::presets::PresetsArgs),
    /// Enhance an image with a preset
    Enhance(commands::enhance::EnhanceArgs),
    /// Render a small full-intensity preview
    Preview(commands::preview::PreviewArgs),
    /// Print channel and luminance histograms
    Histogram(commands::histogram::HistogramArgs),
    /// Shrink stars without running a preset
    ReduceStars(commands::reduce_stars::ReduceStarsArgs),
    /// Apply individual processing steps
    Filter(commands::filter::FilterArgs),
    /// Enhance many images on a bounded worker pool
    Batch(commands::batch::BatchArgs),
    /// Show image dimensions, noise level and star count
    Info(commands::info::InfoArgs),
    /// Generate a default enhancement config file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Enhance(args) => commands::enhance::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Histogram(args) => commands::histogram::run(args),
        Commands::ReduceStars(args) => commands::reduce_stars::run(args),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
