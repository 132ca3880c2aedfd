use ndarray::{Array2, Zip};

use crate::color::process_channels;
use crate::filters::gaussian_blur::{gaussian_blur, gaussian_blur_array};
use crate::frame::{quantize, PixelGrid};

/// `a * alpha + b * beta`, elementwise.
pub fn add_weighted(a: &Array2<f32>, alpha: f32, b: &Array2<f32>, beta: f32) -> Array2<f32> {
    Zip::from(a)
        .and(b)
        .map_collect(|&x, &y| x * alpha + y * beta)
}

/// Unsharp mask as a weighted sum of the grid and its Gaussian blur.
///
/// `sigma` is the blur radius; `weight` and `blur_weight` are the two
/// weights (e.g. 1.5 / -0.5). Output is clipped to the 8-bit range.
pub fn unsharp_mask(grid: &PixelGrid, sigma: f32, weight: f32, blur_weight: f32) -> PixelGrid {
    process_channels(grid, |plane| {
        let blurred = gaussian_blur_array(plane, sigma);
        add_weighted(plane, weight, &blurred, blur_weight)
    })
}

/// Multi-radius unsharp cascade.
///
/// Every blur is taken from `grid` itself; each `(sigma, weight)` stage sharpens
/// the previous stage's clipped output with `weight` and subtracts
/// `weight - 1` of that blur.
pub fn cascaded_unsharp(grid: &PixelGrid, stages: &[(f32, f32)]) -> PixelGrid {
    let mut acc = grid.clone();
    for &(sigma, weight) in stages {
        let blurred = gaussian_blur(grid, sigma);
        let (h, w) = grid.dim();
        let a = acc.data();
        let b = blurred.data();
        acc = PixelGrid::from_shape_fn(h, w, |idx| {
            quantize(f32::from(a[idx]) * weight - f32::from(b[idx]) * (weight - 1.0))
        });
    }
    acc
}
