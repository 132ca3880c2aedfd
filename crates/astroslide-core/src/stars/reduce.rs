use tracing::debug;

use crate::blend::masked_blend;
use crate::consts::{STAR_BACKGROUND_MEDIAN_KERNEL, STAR_MASK_FEATHER_KERNEL};
use crate::detection::{count_stars, detect_stars_aggressive, erode, StructuringElement};
use crate::filters::{gaussian_blur_ksize, median_blur};
use crate::frame::{mask_count, soft_mask, Mask, PixelGrid};

const SENSITIVITY_DROP: f32 = 0.3;
const CORE_PRESERVE: f32 = 0.3;
const CORE_PRESERVE_LIMIT: f32 = 0.9;

/// Shrink stars by blending them toward a median-filtered background.
///
/// `amount` is clamped to [0, 1]; 0 (or NaN) returns an unchanged copy. When
/// `mask` is `None`, stars are detected with sensitivity `1 - 0.3 * amount`.
/// An empty star mask returns an unchanged copy. With `preserve_color` and
/// `amount < 0.9`, `0.3 * (1 - amount)` of the original is kept inside the
/// eroded star cores.
pub fn reduce_stars(
    grid: &PixelGrid,
    mask: Option<&Mask>,
    amount: f32,
    preserve_color: bool,
) -> PixelGrid {
    let amount = if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    };
    if amount <= 0.0 {
        return grid.clone();
    }

    let detected;
    let mask = match mask {
        Some(m) => m,
        None => {
            detected = detect_stars_aggressive(grid, 1.0 - SENSITIVITY_DROP * amount);
            &detected
        }
    };
    if mask_count(mask) == 0 {
        debug!("no stars detected, skipping reduction");
        return grid.clone();
    }
    debug!(amount, stars = count_stars(mask), "reducing stars");

    let background = median_blur(grid, STAR_BACKGROUND_MEDIAN_KERNEL);
    let feathered = gaussian_blur_ksize(&soft_mask(mask), STAR_MASK_FEATHER_KERNEL);
    let coverage = feathered.mapv(|m| m.clamp(0.0, 1.0) * amount);
    let mut result = masked_blend(grid, &background, &coverage);

    if preserve_color && amount < CORE_PRESERVE_LIMIT {
        let core = erode(mask, &StructuringElement::ellipse(5, 5));
        let keep = CORE_PRESERVE * (1.0 - amount);
        let core_coverage = soft_mask(&core).mapv(|m| m * keep);
        result = masked_blend(&result, grid, &core_coverage);
    }

    result
}
