use ndarray::{s, Array2, Axis};
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::filters::resize_bicubic_plane;
use crate::frame::PixelGrid;
use crate::stats::{histogram_percentile, histogram_u8, median};

const BACKGROUND_PERCENTILE: f32 = 25.0;

/// Flatten large-scale background gradients (light pollution, vignetting).
///
/// The grid is split into `grid_size x grid_size` cells; each cell's 25th
/// percentile per channel is a background sample. The samples are bicubically
/// upsampled into a model, subtracted, and the model's global median is added
/// back so overall brightness stays put.
///
/// Returns `(corrected, background_model)`.
pub fn extract_background_gradient(grid: &PixelGrid, grid_size: usize) -> (PixelGrid, PixelGrid) {
    let (h, w) = grid.dim();
    let cells = grid_size.clamp(1, h.min(w));
    let cell_h = h / cells;
    let cell_w = w / cells;

    let data = grid.data();
    let model: Vec<Array2<f32>> = (0..COLOR_CHANNEL_COUNT)
        .map(|c| {
            let plane = data.index_axis(Axis(2), c);
            let samples = Array2::from_shape_fn((cells, cells), |(i, j)| {
                let cell = plane.slice(s![
                    i * cell_h..(i + 1) * cell_h,
                    j * cell_w..(j + 1) * cell_w
                ]);
                histogram_percentile(&histogram_u8(cell.iter()), BACKGROUND_PERCENTILE)
            });
            resize_bicubic_plane(&samples, w, h)
        })
        .collect();

    let mut all: Vec<f32> = model.iter().flat_map(|p| p.iter().copied()).collect();
    let neutral = median(&mut all);
    debug!(cells, neutral, "background model");

    let corrected_planes = [
        &grid.channel(0) - &model[0] + neutral,
        &grid.channel(1) - &model[1] + neutral,
        &grid.channel(2) - &model[2] + neutral,
    ];
    let model_planes = [model[0].clone(), model[1].clone(), model[2].clone()];

    (
        PixelGrid::from_channels(&corrected_planes),
        PixelGrid::from_channels(&model_planes),
    )
}
