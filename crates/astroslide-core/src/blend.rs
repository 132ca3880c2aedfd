//! Region-limited and global blending between two grids of the same shape.

use ndarray::{Array3, Axis, Zip};

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD, STAR_MASK_FEATHER_KERNEL};
use crate::filters::gaussian_blur_ksize;
use crate::frame::{quantize, soft_mask, Mask, PixelGrid, SoftMask};

/// Weighted combination `base * (1 - m) + overlay * m` per pixel.
///
/// `coverage` must have the grid's `(height, width)`. Pixels with coverage 0
/// keep `base` exactly; coverage 1 takes `overlay` exactly.
pub fn masked_blend(base: &PixelGrid, overlay: &PixelGrid, coverage: &SoftMask) -> PixelGrid {
    let (h, w) = base.dim();
    let mut out = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));

    let zip = Zip::from(out.lanes_mut(Axis(2)))
        .and(base.data().lanes(Axis(2)))
        .and(overlay.data().lanes(Axis(2)))
        .and(coverage);
    let mix = |mut dst: ndarray::ArrayViewMut1<u8>,
               a: ndarray::ArrayView1<u8>,
               b: ndarray::ArrayView1<u8>,
               &m: &f32| {
        let m = m.clamp(0.0, 1.0);
        for c in 0..COLOR_CHANNEL_COUNT {
            dst[c] = if m <= 0.0 {
                a[c]
            } else if m >= 1.0 {
                b[c]
            } else {
                quantize(f32::from(a[c]) * (1.0 - m) + f32::from(b[c]) * m)
            };
        }
    };
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(mix);
    } else {
        zip.for_each(mix);
    }

    PixelGrid::from_data(out)
}

/// Replace everything outside a binary mask with `fill`.
pub fn fill_outside(grid: &PixelGrid, mask: &Mask, fill: [u8; 3]) -> PixelGrid {
    let (h, w) = grid.dim();
    let data = grid.data();
    PixelGrid::from_shape_fn(h, w, |(row, col, c)| {
        if mask[[row, col]] > 0 {
            data[[row, col, c]]
        } else {
            fill[c]
        }
    })
}

/// Keep `blend_amount` of the enhancement inside star regions.
///
/// The star mask is feathered with a 7x7 Gaussian; inside it the result moves
/// toward `original` by `1 - blend_amount`.
pub fn apply_with_star_protection(
    original: &PixelGrid,
    enhanced: &PixelGrid,
    star_mask: &Mask,
    blend_amount: f32,
) -> PixelGrid {
    let feathered = gaussian_blur_ksize(&soft_mask(star_mask), STAR_MASK_FEATHER_KERNEL);
    let keep_original = 1.0 - blend_amount.clamp(0.0, 1.0);
    let coverage = feathered.mapv(|m| m.clamp(0.0, 1.0) * keep_original);
    masked_blend(enhanced, original, &coverage)
}

/// Linear mix of the original and fully enhanced grid by `intensity` in [0, 1].
pub fn blend_intensity(original: &PixelGrid, enhanced: &PixelGrid, intensity: f32) -> PixelGrid {
    let i = intensity.clamp(0.0, 1.0);
    if i >= 1.0 {
        return enhanced.clone();
    }
    if i <= 0.0 {
        return original.clone();
    }
    let coverage = SoftMask::from_elem(original.dim(), i);
    masked_blend(original, enhanced, &coverage)
}
