use ndarray::Array2;
use rayon::prelude::*;

use crate::color::process_channels;
use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::filters::border::reflect_101;
use crate::frame::PixelGrid;

/// Apply Gaussian blur to every channel of a grid.
pub fn gaussian_blur(grid: &PixelGrid, sigma: f32) -> PixelGrid {
    process_channels(grid, |plane| gaussian_blur_array(plane, sigma))
}

/// Apply Gaussian blur to a raw array using separable 1D convolution.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(sigma);
    convolve_separable(data, &kernel)
}

/// Gaussian blur with an explicit odd kernel size and sigma derived from it.
///
/// Sigma follows the usual `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8` rule so a
/// 7-tap kernel gets sigma 1.4.
pub fn gaussian_blur_ksize(data: &Array2<f32>, ksize: usize) -> Array2<f32> {
    let ksize = ksize.max(1) | 1;
    if ksize == 1 {
        return data.clone();
    }
    let sigma = sigma_for_ksize(ksize);
    let radius = ksize / 2;
    let kernel = gaussian_kernel_with_radius(sigma, radius);
    convolve_separable(data, &kernel)
}

pub fn sigma_for_ksize(ksize: usize) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    gaussian_kernel_with_radius(sigma, radius)
}

fn gaussian_kernel_with_radius(sigma: f32, radius: usize) -> Vec<f32> {
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Convolve rows then columns with the same 1D kernel (reflect-101 borders).
pub(crate) fn convolve_separable(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let row_pass = convolve_rows(data, kernel);
    convolve_cols(&row_pass, kernel)
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let row_fn = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_col = reflect_101(col as isize + ki as isize - radius as isize, w);
                    sum += data[[row, src_col]] * kv;
                }
                sum
            })
            .collect()
    };

    collect_rows(h, w, row_fn)
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let row_fn = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_row = reflect_101(row as isize + ki as isize - radius as isize, h);
                    sum += data[[src_row, col]] * kv;
                }
                sum
            })
            .collect()
    };

    collect_rows(h, w, row_fn)
}

/// Evaluate `row_fn` for every row, in parallel for large images.
pub(crate) fn collect_rows<F>(h: usize, w: usize, row_fn: F) -> Array2<f32>
where
    F: Fn(usize) -> Vec<f32> + Sync + Send,
{
    collect_rows_as(h, w, row_fn)
}

/// [`collect_rows`] for any sample type.
pub(crate) fn collect_rows_as<T, F>(h: usize, w: usize, row_fn: F) -> Array2<T>
where
    T: Clone + Default + Send,
    F: Fn(usize) -> Vec<T> + Sync + Send,
{
    let rows: Vec<Vec<T>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(&row_fn).collect()
    } else {
        (0..h).map(&row_fn).collect()
    };

    let mut result = Array2::<T>::default((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}
