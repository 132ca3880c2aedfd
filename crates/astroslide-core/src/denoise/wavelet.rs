use ndarray::Array2;
use tracing::debug;

use crate::color::{rgb_to_ycbcr, ycbcr_to_rgb, YCbCrPlanes};
use crate::consts::{B3_NOISE_SCALE, EPSILON, MAD_TO_SIGMA, WAVELET_DENOISE_LAYERS};
use crate::filters::gaussian_blur::collect_rows;
use crate::frame::PixelGrid;
use crate::stats::median;

/// B3 spline 1D kernel coefficients: [1, 4, 6, 4, 1] / 16.
const B3_KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Coefficient shrinkage rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shrinkage {
    /// Per-layer adaptive threshold `sigma^2 / sigma_signal`; keeps fine structure.
    Bayes,
    /// Universal threshold `sigma * sqrt(2 ln N)`; removes more.
    Visu,
}

/// Wavelet shrinkage denoise in luma/chroma space.
///
/// Each YCbCr plane is split into à trous detail layers; the noise sigma is
/// estimated from the finest layer (median absolute deviation), scaled by
/// `strength`, and every layer is soft-thresholded before reconstruction.
/// `preserve_details` selects [`Shrinkage::Bayes`], otherwise [`Shrinkage::Visu`].
pub fn wavelet_denoise(grid: &PixelGrid, strength: f32, preserve_details: bool) -> PixelGrid {
    let mode = if preserve_details {
        Shrinkage::Bayes
    } else {
        Shrinkage::Visu
    };
    if strength <= 0.0 {
        return grid.clone();
    }

    let planes = rgb_to_ycbcr(grid);
    let (y, (cb, cr)) = rayon::join(
        || denoise_plane(&planes.y, strength, mode),
        || {
            rayon::join(
                || denoise_plane(&planes.cb, strength, mode),
                || denoise_plane(&planes.cr, strength, mode),
            )
        },
    );
    ycbcr_to_rgb(&YCbCrPlanes { y, cb, cr })
}

/// Denoise one plane; returns the unclipped reconstruction.
pub fn denoise_plane(data: &Array2<f32>, strength: f32, mode: Shrinkage) -> Array2<f32> {
    let (layers, residual) = decompose(data, WAVELET_DENOISE_LAYERS);
    let Some(finest) = layers.first() else {
        return data.clone();
    };

    let noise_sigma = estimate_sigma(finest) / B3_NOISE_SCALE[0] * strength;
    debug!(noise_sigma, ?mode, "wavelet shrinkage");
    if noise_sigma <= EPSILON {
        return data.clone();
    }

    let n = data.len() as f32;
    let mut result = residual;
    for (scale, layer) in layers.iter().enumerate() {
        let layer_sigma = noise_sigma * B3_NOISE_SCALE[scale.min(B3_NOISE_SCALE.len() - 1)];
        let threshold = match mode {
            Shrinkage::Bayes => bayes_threshold(layer, layer_sigma),
            Shrinkage::Visu => layer_sigma * (2.0 * n.ln()).sqrt(),
        };
        result += &layer.mapv(|w| soft_threshold(w, threshold));
    }
    result
}

/// Noise sigma from the median absolute deviation of a detail layer.
pub fn estimate_sigma(layer: &Array2<f32>) -> f32 {
    let mut abs: Vec<f32> = layer.iter().map(|v| v.abs()).collect();
    median(&mut abs) / MAD_TO_SIGMA
}

fn bayes_threshold(layer: &Array2<f32>, sigma: f32) -> f32 {
    let variance = layer.iter().map(|&w| w * w).sum::<f32>() / layer.len().max(1) as f32;
    let noise_var = sigma * sigma;
    let signal_var = variance - noise_var;
    if signal_var <= EPSILON {
        // Layer is indistinguishable from noise.
        return layer.iter().fold(0.0f32, |m, w| m.max(w.abs()));
    }
    noise_var / signal_var.sqrt()
}

#[inline]
fn soft_threshold(w: f32, threshold: f32) -> f32 {
    let abs_w = w.abs();
    if abs_w <= threshold {
        0.0
    } else {
        w.signum() * (abs_w - threshold)
    }
}

/// Decompose a plane into à trous detail layers + residual.
///
/// `data == sum(layers) + residual` holds exactly.
pub fn decompose(data: &Array2<f32>, num_layers: usize) -> (Vec<Array2<f32>>, Array2<f32>) {
    let mut layers = Vec::with_capacity(num_layers);
    let mut current = data.clone();

    for scale in 0..num_layers {
        let smoothed = atrous_convolve(&current, scale);
        layers.push(&current - &smoothed);
        current = smoothed;
    }

    (layers, current)
}

/// Separable B3 convolution with holes of `2^scale` samples.
fn atrous_convolve(data: &Array2<f32>, scale: usize) -> Array2<f32> {
    let step = 1isize << scale;
    let (h, w) = data.dim();

    let rows = collect_rows(h, w, |row| {
        (0..w)
            .map(|col| {
                B3_KERNEL
                    .iter()
                    .enumerate()
                    .map(|(ki, &kv)| {
                        let src = mirror_index(col as isize + (ki as isize - 2) * step, w);
                        data[[row, src]] * kv
                    })
                    .sum()
            })
            .collect()
    });

    collect_rows(h, w, |row| {
        (0..w)
            .map(|col| {
                B3_KERNEL
                    .iter()
                    .enumerate()
                    .map(|(ki, &kv)| {
                        let src = mirror_index(row as isize + (ki as isize - 2) * step, h);
                        rows[[src, col]] * kv
                    })
                    .sum()
            })
            .collect()
    })
}

/// Reflect an index into `[0, size)`, bouncing off both ends.
pub fn mirror_index(idx: isize, size: usize) -> usize {
    if size <= 1 {
        return 0;
    }
    let period = 2 * size as isize;
    let m = idx.rem_euclid(period);
    if m < size as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}
