use tracing::debug;

use super::components::connected_components;
use super::morphology::{close, dilate, open, StructuringElement};
use super::threshold::{adaptive_mean_threshold, binary_threshold, mask_union, mean_sigma_threshold};
use crate::color::grayscale;
use crate::consts::ADAPTIVE_THRESHOLD_BLOCK;
use crate::frame::{Mask, PixelGrid};

/// Default sigma multiplier for [`create_star_mask`].
pub const DEFAULT_STAR_THRESHOLD_FACTOR: f32 = 2.5;

const ADAPTIVE_BIAS_SCALE: f32 = 3.0;
const GLOBAL_SIGMA_SCALE: f32 = 1.5;

/// Binary mask of bright point sources.
///
/// Grayscale is thresholded at `mean + threshold_factor * stddev`, then
/// cleaned with [`clean_star_mask`]. Higher factors detect fewer stars.
pub fn create_star_mask(grid: &PixelGrid, threshold_factor: f32) -> Mask {
    let gray = grayscale(grid);
    let threshold = mean_sigma_threshold(&gray, threshold_factor);
    let bright = binary_threshold(&gray, threshold);
    clean_star_mask(&bright)
}

/// More inclusive star mask used for star reduction.
///
/// Union of a local adaptive threshold (31x31 mean, bias `3 * sensitivity`)
/// and a global `mean + 1.5 * sensitivity * stddev` threshold. Lower
/// sensitivity picks up fainter and smaller stars.
pub fn detect_stars_aggressive(grid: &PixelGrid, sensitivity: f32) -> Mask {
    let gray = grayscale(grid);
    let local = adaptive_mean_threshold(
        &gray,
        ADAPTIVE_THRESHOLD_BLOCK,
        -ADAPTIVE_BIAS_SCALE * sensitivity,
    );
    let global_threshold = mean_sigma_threshold(&gray, GLOBAL_SIGMA_SCALE * sensitivity);
    let global = binary_threshold(&gray, global_threshold);
    debug!(sensitivity, global_threshold, "aggressive star detection");
    clean_star_mask(&mask_union(&local, &global))
}

/// Open (3x3 ellipse) to drop specks, close (5x5) to fill, dilate (5x5) for a margin.
pub fn clean_star_mask(mask: &Mask) -> Mask {
    let small = StructuringElement::ellipse(3, 3);
    let medium = StructuringElement::ellipse(5, 5);
    let opened = open(mask, &small);
    let closed = close(&opened, &medium);
    dilate(&closed, &medium)
}

/// Number of separate stars in a mask.
pub fn count_stars(mask: &Mask) -> usize {
    connected_components(mask).len()
}
