//! Lunar presets. Every stage is confined to the moon disk and the sky is
//! forced to black at the end.

use ndarray::{Array2, Zip};
use tracing::debug;

use crate::adjust::{calculate_adaptive_saturation, scale_saturation};
use crate::blend::{fill_outside, masked_blend};
use crate::color::convert::{lightness_from_u8, lightness_to_u8};
use crate::color::{grayscale, lab_to_rgb, rgb_to_lab};
use crate::denoise::nlm_denoise_colored;
use crate::detection::{close, open, StructuringElement};
use crate::filters::curves::{apply_curve, apply_lut, highlight_knee, s_curve_lut, shadow_lift};
use crate::filters::{cascaded_unsharp, clahe, unsharp_mask};
use crate::frame::{quantize, soft_mask, threshold_mask, Mask, PixelGrid};

const BLACK: [u8; 3] = [0, 0, 0];

const SUBTLE_DISK_THRESHOLD: f32 = 10.0;
const HDR_DISK_THRESHOLD: f32 = 15.0;

/// Tile grids (x, y), clip limits and blend weights of the HDR CLAHE scales.
const HDR_SCALES: [((usize, usize), f32, f32); 3] = [
    ((4, 4), 3.0, 0.25),
    ((8, 8), 2.5, 0.35),
    ((16, 16), 2.0, 0.40),
];

/// Conservative lunar enhancement that keeps mineral color believable.
pub(super) fn mineral_moon_subtle(grid: &PixelGrid) -> PixelGrid {
    let disk = threshold_mask(&grayscale(grid), SUBTLE_DISK_THRESHOLD);
    let coverage = soft_mask(&disk);

    let equalized = map_lightness(grid, |l| clahe(l, 1.5, (8, 8)));
    let mut result = masked_blend(grid, &equalized, &coverage);

    let factor = calculate_adaptive_saturation(&result, &disk, 1.4);
    debug!(factor, "mineral moon saturation");
    let saturated = scale_saturation(&result, factor);
    result = masked_blend(&result, &saturated, &coverage);

    let sharpened = unsharp_mask(&result, 1.0, 1.2, -0.2);
    result = masked_blend(&result, &sharpened, &coverage);

    let denoised = nlm_denoise_colored(&result, 2.0, 2.0, 7, 15);
    result = masked_blend(&result, &denoised, &coverage);

    fill_outside(&result, &disk, BLACK)
}

/// HDR-style tone mapping for bright, well-stacked lunar captures.
pub(super) fn moon_hdr(grid: &PixelGrid) -> PixelGrid {
    let disk = moon_disk_mask(grid);
    let coverage = soft_mask(&disk);

    let tone_mapped = map_lightness(grid, multi_scale_clahe);
    let mut result = masked_blend(grid, &tone_mapped, &coverage);

    let lifted = map_lightness(&result, |l| apply_curve(l, |v| shadow_lift(v, 0.85, 0.4)));
    result = masked_blend(&result, &lifted, &coverage);

    let compressed = map_lightness(&result, |l| apply_curve(l, |v| highlight_knee(v, 0.75, 0.3)));
    result = masked_blend(&result, &compressed, &coverage);

    let detailed = cascaded_unsharp(&result, &[(1.0, 1.3), (2.5, 1.2), (5.0, 1.15)]);
    result = masked_blend(&result, &detailed, &coverage);

    let lut = s_curve_lut(10.0, 0.3);
    let contrasted = map_lightness(&result, |l| apply_lut(l, &lut));
    result = masked_blend(&result, &contrasted, &coverage);

    let denoised = nlm_denoise_colored(&result, 3.0, 3.0, 7, 15);
    result = masked_blend(&result, &denoised, &coverage);

    fill_outside(&result, &disk, BLACK)
}

/// Brightness threshold cleaned with a 5x5 elliptical close then open.
fn moon_disk_mask(grid: &PixelGrid) -> Mask {
    let raw = threshold_mask(&grayscale(grid), HDR_DISK_THRESHOLD);
    let ellipse = StructuringElement::ellipse(5, 5);
    open(&close(&raw, &ellipse), &ellipse)
}

/// Three CLAHE passes at coarse, medium and fine tiles, mixed toward fine detail.
fn multi_scale_clahe(l: &Array2<u8>) -> Array2<u8> {
    let [coarse, medium, fine] = HDR_SCALES;
    let (a, (b, c)) = rayon::join(
        || clahe(l, coarse.1, coarse.0),
        || rayon::join(|| clahe(l, medium.1, medium.0), || clahe(l, fine.1, fine.0)),
    );
    Zip::from(&a)
        .and(&b)
        .and(&c)
        .map_collect(|&x, &y, &z| {
            quantize(
                f32::from(x) * coarse.2 + f32::from(y) * medium.2 + f32::from(z) * fine.2,
            )
        })
}

/// Run `f` on the 8-bit L* plane and convert back, leaving a* and b* alone.
fn map_lightness<F>(grid: &PixelGrid, f: F) -> PixelGrid
where
    F: FnOnce(&Array2<u8>) -> Array2<u8>,
{
    let mut lab = rgb_to_lab(grid);
    let l = f(&lightness_to_u8(&lab.l));
    lab.l = lightness_from_u8(&l);
    lab_to_rgb(&lab)
}
