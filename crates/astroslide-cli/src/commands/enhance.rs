use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use astroslide_core::pipeline::{
    enhance_reported, EnhanceConfig, EnhanceRequest, EnhanceStage, OutputFormat, ProgressReporter,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Args)]
pub struct EnhanceArgs {
    /// Input image (JPEG, PNG, TIFF or FITS)
    pub file: Option<PathBuf>,

    /// Enhancement config file (TOML); overrides the other flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset identifier (see `astroslide presets`)
    #[arg(short, long, default_value = "general")]
    pub preset: String,

    /// Blend between original (0.0) and full enhancement (1.0)
    #[arg(short, long, default_value = "0.75")]
    pub intensity: f32,

    /// Overlay subtle diffraction spikes on bright stars
    #[arg(long)]
    pub star_spikes: bool,

    /// Output encoding (jpeg, png, tiff); guessed from the output path if omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Output file path
    #[arg(short, long, default_value = "enhanced.jpg")]
    pub output: PathBuf,
}

/// Spinner that shows the current stage name.
struct SpinnerReporter(ProgressBar);

impl ProgressReporter for SpinnerReporter {
    fn begin_stage(&self, stage: EnhanceStage, _total_items: Option<usize>) {
        self.0.set_message(stage.to_string());
    }
}

pub fn run(args: &EnhanceArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid enhancement config")?
    } else {
        build_config_from_args(args)?
    };
    let request = config.request();
    let format = config.output_format()?;

    crate::summary::print_enhance_summary(&config, &request, format);

    let grid = super::load(&config.input)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    let reporter = Arc::new(SpinnerReporter(pb.clone()));

    let result = enhance_reported(&grid, &request, reporter);
    pb.finish_with_message("Done");

    super::save(&result, &config.output, Some(format))
}

fn build_config_from_args(args: &EnhanceArgs) -> Result<EnhanceConfig> {
    let Some(ref input) = args.file else {
        anyhow::bail!("An input file is required unless --config is given");
    };
    let request = EnhanceRequest::parse(&args.preset, Some(args.intensity), args.star_spikes)?;
    Ok(EnhanceConfig {
        input: input.clone(),
        output: args.output.clone(),
        preset: request.preset,
        intensity: request.intensity,
        star_spikes: request.star_spikes,
        format: args.format,
    })
}
