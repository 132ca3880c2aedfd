use ndarray::Array2;
use tracing::debug;

use super::wavelet::wavelet_denoise;
use crate::blend::masked_blend;
use crate::color::{grayscale, luminance};
use crate::filters::{bilateral_filter, gaussian_blur_ksize, local_variance};
use crate::frame::{PixelGrid, SoftMask};
use crate::stats::plane_mean_stddev;

const WAVELET_SHARE: f32 = 0.9;
const BILATERAL_DIAMETER: usize = 9;
const BILATERAL_SIGMA_COLOR: f32 = 75.0;
const BILATERAL_SIGMA_SPACE: f32 = 75.0;
const DETAIL_WINDOW: usize = 7;
const STAR_SIGMA: f64 = 2.0;
const STAR_FEATHER_KERNEL: usize = 5;
const STAR_RESTORE: f32 = 0.7;

/// Hybrid denoise tuned for astro frames.
///
/// Wavelet shrinkage at `0.9 * strength`; with `edge_aware`, smooth areas are
/// pulled toward a bilateral filter while textured areas keep the wavelet
/// result; with `protect_stars`, 70% of the original is restored inside a
/// feathered mask of pixels brighter than mean + 2 sigma.
pub fn astro_denoise(
    grid: &PixelGrid,
    strength: f32,
    protect_stars: bool,
    edge_aware: bool,
) -> PixelGrid {
    let mut result = wavelet_denoise(grid, strength * WAVELET_SHARE, true);

    if edge_aware {
        let smooth = bilateral_filter(
            &result,
            BILATERAL_DIAMETER,
            BILATERAL_SIGMA_COLOR,
            BILATERAL_SIGMA_SPACE,
        );
        let detail = detail_mask(&grayscale(&result));
        // detail -> wavelet, flat -> bilateral
        result = masked_blend(&smooth, &result, &detail);
    }

    if protect_stars {
        let stars = bright_region_mask(grid);
        let restore = stars.mapv(|m| m * STAR_RESTORE);
        result = masked_blend(&result, grid, &restore);
    }

    result
}

/// Local variance normalized by its maximum, in [0, 1].
pub fn detail_mask(gray: &Array2<f32>) -> SoftMask {
    let variance = local_variance(gray, DETAIL_WINDOW);
    let max = variance.iter().copied().fold(0.0f32, f32::max);
    if max <= 0.0 {
        return Array2::zeros(gray.dim());
    }
    variance.mapv(|v| v / max)
}

/// Feathered mask of pixels brighter than mean + 2 sigma of the luminance.
fn bright_region_mask(grid: &PixelGrid) -> SoftMask {
    let lum = luminance(grid);
    let (mean, std) = plane_mean_stddev(&lum);
    let threshold = (mean + STAR_SIGMA * std) as f32;
    let hard = lum.mapv(|v| if v > threshold { 1.0 } else { 0.0 });
    debug!(threshold, "astro denoise star protection");
    let soft = gaussian_blur_ksize(&hard, STAR_FEATHER_KERNEL);
    soft.mapv(|v| v.clamp(0.0, 1.0))
}
