pub mod batch;
pub mod config;
mod orchestrator;
mod types;

pub use batch::{enhance_batch, BatchJob};
pub use config::{clamp_intensity, EnhanceConfig, EnhanceRequest, OutputFormat};
pub use orchestrator::{
    enhance, enhance_reported, enhance_with_preset, histogram, preview, preview_dimensions,
    reduce_stars_standalone,
};
pub use types::{EnhanceStage, NoOpReporter, ProgressReporter};
