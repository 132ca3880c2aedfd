use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::consts::DEFAULT_WORKER_COUNT;
use crate::error::{AstroError, Result};
use crate::io::{load_rgb, save_rgb};

use super::config::{EnhanceRequest, OutputFormat};
use super::orchestrator::enhance;
use super::types::{EnhanceStage, ProgressReporter};

/// One file to enhance.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub request: EnhanceRequest,
    pub format: OutputFormat,
}

/// Enhance many files on a fixed-size worker pool.
///
/// At most `workers` jobs (default 4) run at once; the rest queue. Each job
/// runs to completion or fails on its own. Results are in input order.
pub fn enhance_batch(
    jobs: &[BatchJob],
    workers: Option<usize>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<Vec<Result<PathBuf>>> {
    let workers = workers.unwrap_or(DEFAULT_WORKER_COUNT).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("astroslide-worker-{i}"))
        .build()
        .map_err(|e| AstroError::Processing(format!("worker pool: {e}")))?;

    info!(jobs = jobs.len(), workers, "Starting batch");
    reporter.begin_stage(EnhanceStage::Enhancing, Some(jobs.len()));
    let done = AtomicUsize::new(0);

    let results: Vec<Result<PathBuf>> = pool.install(|| {
        jobs.par_iter()
            .with_max_len(1)
            .map(|job| {
                let outcome = run_job(job);
                if let Err(e) = &outcome {
                    warn!(input = %job.input.display(), error = %e, "Batch job failed");
                }
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                reporter.advance(n);
                outcome
            })
            .collect()
    });

    reporter.finish_stage();
    Ok(results)
}

fn run_job(job: &BatchJob) -> Result<PathBuf> {
    let grid = load_rgb(&job.input)?;
    let enhanced = enhance(&grid, &job.request);
    save_rgb(&enhanced, &job.output, job.format)?;
    Ok(job.output.clone())
}
