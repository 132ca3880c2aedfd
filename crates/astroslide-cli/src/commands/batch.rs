use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use astroslide_core::io::is_accepted_name;
use astroslide_core::pipeline::{
    enhance_batch, BatchJob, EnhanceRequest, EnhanceStage, OutputFormat, ProgressReporter,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

#[derive(Args)]
pub struct BatchArgs {
    /// Input images or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Preset identifier
    #[arg(short, long, default_value = "general")]
    pub preset: String,

    /// Blend between original (0.0) and full enhancement (1.0)
    #[arg(short, long, default_value = "0.75")]
    pub intensity: f32,

    /// Overlay subtle diffraction spikes on bright stars
    #[arg(long)]
    pub star_spikes: bool,

    /// Output encoding
    #[arg(long, default_value = "jpeg")]
    pub format: OutputFormat,

    /// Number of images processed at once
    #[arg(short, long, default_value = "4")]
    pub workers: usize,

    /// Output directory
    #[arg(short, long, default_value = "enhanced")]
    pub output_dir: PathBuf,
}

/// Drives an indicatif bar from batch progress callbacks.
struct BarReporter(ProgressBar);

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: EnhanceStage, total_items: Option<usize>) {
        if let Some(total) = total_items {
            self.0.set_length(total as u64);
        }
        self.0.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.0.set_position(items_done as u64);
    }
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let request = EnhanceRequest::parse(&args.preset, Some(args.intensity), args.star_spikes)?;
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("No supported images found");
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let jobs: Vec<BatchJob> = inputs
        .into_iter()
        .map(|input| BatchJob {
            output: output_path(&args.output_dir, &input, &request, args.format),
            input,
            request,
            format: args.format,
        })
        .collect();

    crate::summary::print_batch_summary(&request, jobs.len(), args.workers, &args.output_dir);

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter(pb.clone()));

    let results = enhance_batch(&jobs, Some(args.workers), reporter)?;
    pb.finish_with_message("Done");

    let mut failed = 0usize;
    println!();
    for (job, result) in jobs.iter().zip(&results) {
        match result {
            Ok(path) => println!("  ok    {} -> {}", job.input.display(), path.display()),
            Err(e) => {
                failed += 1;
                println!("  fail  {}: {}", job.input.display(), e);
            }
        }
    }
    println!(
        "\n{} of {} images enhanced",
        results.len() - failed,
        results.len()
    );

    if failed > 0 {
        anyhow::bail!("{failed} image(s) failed");
    }
    Ok(())
}

/// Expand directories one level deep into their supported image files.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| {
                    p.is_file()
                        && p.file_name()
                            .is_some_and(|n| is_accepted_name(&n.to_string_lossy()))
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    debug!(count = files.len(), "Collected batch inputs");
    Ok(files)
}

fn output_path(dir: &Path, input: &Path, request: &EnhanceRequest, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!(
        "{stem}_{}.{}",
        request.preset.id(),
        format.extension()
    ))
}
