use crate::adjust::scale_saturation;
use crate::consts::{STRETCH_HIGH_PERCENTILE, STRETCH_LOW_PERCENTILE};
use crate::denoise::nlm_denoise_colored;
use crate::filters::percentile_stretch;
use crate::frame::PixelGrid;

/// Balanced enhancement: stretch, +15% saturation, light NLM.
pub(super) fn general(grid: &PixelGrid) -> PixelGrid {
    let stretched = percentile_stretch(grid, STRETCH_LOW_PERCENTILE, STRETCH_HIGH_PERCENTILE);
    let saturated = scale_saturation(&stretched, 1.15);
    nlm_denoise_colored(&saturated, 2.0, 2.0, 7, 15)
}
