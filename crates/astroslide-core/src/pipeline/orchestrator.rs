use std::sync::Arc;

use tracing::{debug, info};

use crate::blend::blend_intensity;
use crate::consts::{DEFAULT_STAR_REDUCTION, PREVIEW_MAX_DIMENSION};
use crate::error::Result;
use crate::filters::{histogram as compute_histogram, resize_area, Histogram};
use crate::frame::PixelGrid;
use crate::stars::{add_star_spikes, reduce_stars, SpikeParams};

use super::config::EnhanceRequest;
use super::types::{EnhanceStage, NoOpReporter, ProgressReporter};

/// Enhance `grid` with the preset named `preset_id`.
///
/// Unknown identifiers fail before any pixel work; `intensity` is clamped
/// into [0, 1].
pub fn enhance_with_preset(
    grid: &PixelGrid,
    preset_id: &str,
    intensity: f32,
    star_spikes: bool,
) -> Result<PixelGrid> {
    let request = EnhanceRequest::parse(preset_id, Some(intensity), star_spikes)?;
    Ok(enhance(grid, &request))
}

/// Run a validated request without progress reporting.
pub fn enhance(grid: &PixelGrid, request: &EnhanceRequest) -> PixelGrid {
    enhance_reported(grid, request, Arc::new(NoOpReporter))
}

/// Run a validated request with a thread-safe progress reporter.
///
/// The preset runs at full strength, is mixed with the original by the
/// request's intensity, and optionally receives the subtle spike overlay.
pub fn enhance_reported(
    grid: &PixelGrid,
    request: &EnhanceRequest,
    reporter: Arc<dyn ProgressReporter>,
) -> PixelGrid {
    let (h, w) = grid.dim();
    info!(
        preset = request.preset.id(),
        intensity = request.intensity,
        star_spikes = request.star_spikes,
        width = w,
        height = h,
        "Enhancing image"
    );

    reporter.begin_stage(EnhanceStage::Enhancing, None);
    let enhanced = request.preset.run(grid);
    reporter.finish_stage();

    let mut result = if request.intensity < 1.0 {
        reporter.begin_stage(EnhanceStage::Blending, None);
        let blended = blend_intensity(grid, &enhanced, request.intensity);
        reporter.finish_stage();
        blended
    } else {
        enhanced
    };

    if request.star_spikes {
        reporter.begin_stage(EnhanceStage::StarSpikes, None);
        result = add_star_spikes(&result, &SpikeParams::default());
        reporter.finish_stage();
    }

    info!(preset = request.preset.id(), "Enhancement complete");
    result
}

/// Low-resolution, full-intensity render for quick previews.
pub fn preview(grid: &PixelGrid, preset_id: &str) -> Result<PixelGrid> {
    let request = EnhanceRequest::parse(preset_id, Some(1.0), false)?;
    let (width, height) = preview_dimensions(grid.width(), grid.height());
    debug!(width, height, "preview size");
    let small = if (width, height) == (grid.width(), grid.height()) {
        grid.clone()
    } else {
        resize_area(grid, width, height)
    };
    Ok(enhance(&small, &request))
}

/// Aspect-preserving size whose longer side is at most the preview limit.
/// Grids already within the limit keep their size.
pub fn preview_dimensions(width: usize, height: usize) -> (usize, usize) {
    let longest = width.max(height);
    if longest <= PREVIEW_MAX_DIMENSION {
        return (width, height);
    }
    let scale = PREVIEW_MAX_DIMENSION as f64 / longest as f64;
    let fit = |v: usize| ((v as f64 * scale).round() as usize).clamp(1, PREVIEW_MAX_DIMENSION);
    (fit(width), fit(height))
}

/// Star reduction outside any preset; `amount` defaults to 0.5.
pub fn reduce_stars_standalone(grid: &PixelGrid, amount: Option<f32>) -> PixelGrid {
    let amount = amount.unwrap_or(DEFAULT_STAR_REDUCTION);
    info!(amount, "Reducing stars");
    reduce_stars(grid, None, amount, true)
}

/// Channel and luminance histograms.
pub fn histogram(grid: &PixelGrid) -> Histogram {
    compute_histogram(grid)
}
