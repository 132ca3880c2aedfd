use ndarray::Array2;
use rayon::prelude::*;

use crate::frame::PixelGrid;

/// Apply a processing function to each channel of a grid independently.
///
/// Channels are processed in parallel; the float result is rounded and
/// clipped back into the 8-bit domain.
pub fn process_channels<F>(grid: &PixelGrid, process_fn: F) -> PixelGrid
where
    F: Fn(&Array2<f32>) -> Array2<f32> + Sync + Send,
{
    let planes = grid.channels();
    let processed = process_planes(&planes, process_fn);
    PixelGrid::from_channels(&processed)
}

/// Apply a function to three float planes in parallel.
pub fn process_planes<F>(planes: &[Array2<f32>; 3], process_fn: F) -> [Array2<f32>; 3]
where
    F: Fn(&Array2<f32>) -> Array2<f32> + Sync + Send,
{
    let mut out: Vec<Array2<f32>> = planes.par_iter().map(&process_fn).collect();
    let b = out.pop().unwrap_or_default();
    let g = out.pop().unwrap_or_default();
    let r = out.pop().unwrap_or_default();
    [r, g, b]
}
