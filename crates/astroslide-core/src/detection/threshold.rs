use ndarray::{Array2, Zip};

use crate::filters::box_mean;
use crate::frame::Mask;
use crate::stats::plane_mean_stddev;

/// `mean + sigma_mul * stddev` of a plane.
pub fn mean_sigma_threshold(data: &Array2<f32>, sigma_mul: f32) -> f32 {
    let (mean, std) = plane_mean_stddev(data);
    (mean + sigma_mul as f64 * std) as f32
}

/// Binary mask of samples strictly above `threshold`.
pub fn binary_threshold(data: &Array2<f32>, threshold: f32) -> Mask {
    data.mapv(|v| if v > threshold { 255 } else { 0 })
}

/// Adaptive mean threshold: a sample is set when it exceeds the mean of its
/// `block x block` neighborhood minus `offset`.
///
/// A negative `offset` demands the sample stand out above its surroundings.
pub fn adaptive_mean_threshold(data: &Array2<f32>, block: usize, offset: f32) -> Mask {
    let local_mean = box_mean(data, block.max(3) | 1);
    Zip::from(data)
        .and(&local_mean)
        .map_collect(|&v, &m| if v > m - offset { 255 } else { 0 })
}

/// Elementwise union of two masks.
pub fn mask_union(a: &Mask, b: &Mask) -> Mask {
    Zip::from(a).and(b).map_collect(|&x, &y| x.max(y))
}
