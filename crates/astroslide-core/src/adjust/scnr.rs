use crate::color::luma;
use crate::frame::PixelGrid;

const LIGHTNESS_RATIO_MIN: f32 = 0.9;
const LIGHTNESS_RATIO_MAX: f32 = 1.1;

/// Subtractive green cast removal (average-neutral SCNR).
///
/// Green above `(R + B) / 2` is removed by `amount` (clamped to [0, 1]).
/// With `preserve_lightness`, the new green is rescaled toward the original
/// luma, the correction ratio limited to [0.9, 1.1].
pub fn scnr_green_removal(grid: &PixelGrid, amount: f32, preserve_lightness: bool) -> PixelGrid {
    let amount = amount.clamp(0.0, 1.0);
    grid.map_pixels(|[r, g, b]| {
        let neutral = (r + b) * 0.5;
        let excess = (g - neutral).max(0.0);
        let mut new_g = g - excess * amount;

        if preserve_lightness && excess > 0.0 {
            let before = luma(r, g, b);
            let after = luma(r, new_g, b);
            if after > 0.0 {
                let ratio = (before / after).clamp(LIGHTNESS_RATIO_MIN, LIGHTNESS_RATIO_MAX);
                new_g *= ratio;
            }
        }
        [r, new_g, b]
    })
}
