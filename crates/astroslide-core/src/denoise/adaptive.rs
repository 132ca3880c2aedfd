use tracing::debug;

use super::nlm::nlm_denoise_colored;
use super::noise::estimate_noise_level;
use crate::frame::PixelGrid;

const TEMPLATE_WINDOW: usize = 7;
const SEARCH_WINDOW: usize = 21;
const MAX_LUMINANCE_STRENGTH: i32 = 15;
const MAX_COLOR_STRENGTH: i32 = 12;
const COLOR_STRENGTH_RATIO: f32 = 0.8;

/// Non-local means denoise with strength scaled by the measured noise level.
///
/// The multiplier runs from 0.5 (clean) to 2.5 (noisy). Derived strengths are
/// truncated to whole numbers and clamped to [1, 15] for luminance and
/// [1, 12] for color.
pub fn adaptive_denoise(grid: &PixelGrid, base_strength: f32) -> PixelGrid {
    let (h_lum, h_color) = adaptive_strengths(estimate_noise_level(grid), base_strength);
    nlm_denoise_colored(
        grid,
        h_lum as f32,
        h_color as f32,
        TEMPLATE_WINDOW,
        SEARCH_WINDOW,
    )
}

/// Luminance and color filter strengths for a given noise level.
pub fn adaptive_strengths(noise_level: f32, base_strength: f32) -> (i32, i32) {
    let multiplier = 0.5 + noise_level * 2.0;
    let h_lum = ((base_strength * multiplier) as i32).clamp(1, MAX_LUMINANCE_STRENGTH);
    let h_color =
        ((base_strength * multiplier * COLOR_STRENGTH_RATIO) as i32).clamp(1, MAX_COLOR_STRENGTH);
    debug!(noise_level, h_lum, h_color, "adaptive denoise strengths");
    (h_lum, h_color)
}
