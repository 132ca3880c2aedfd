use ndarray::Array2;

use crate::color::grayscale;
use crate::consts::NOISE_NORMALIZATION;
use crate::filters::border::reflect_101;
use crate::frame::PixelGrid;

/// Estimate how noisy a grid is, in [0, 1].
///
/// Computes the variance of the 3x3 Laplacian response over the 8-bit
/// grayscale image and divides by a fixed normalization, saturating at 1.0.
pub fn estimate_noise_level(grid: &PixelGrid) -> f32 {
    let gray = grayscale(grid);
    let variance = laplacian_variance(&gray);
    (variance / NOISE_NORMALIZATION).min(1.0) as f32
}

/// Variance of the Laplacian response:
///   0  1  0
///   1 -4  1
///   0  1  0
/// Borders reflect without repeating the edge sample.
pub fn laplacian_variance(data: &Array2<f32>) -> f64 {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return 0.0;
    }

    let at = |row: isize, col: isize| -> f64 {
        data[[reflect_101(row, h), reflect_101(col, w)]] as f64
    };

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for row in 0..h as isize {
        for col in 0..w as isize {
            let lap = -4.0 * at(row, col)
                + at(row - 1, col)
                + at(row + 1, col)
                + at(row, col - 1)
                + at(row, col + 1);
            sum += lap;
            sum_sq += lap * lap;
        }
    }

    let count = (h * w) as f64;
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_plane_has_no_noise() {
        let flat = Array2::from_elem((16, 16), 90.0f32);
        assert_eq!(laplacian_variance(&flat), 0.0);
    }

    #[test]
    fn test_checkerboard_saturates() {
        let grid = PixelGrid::from_gray(&Array2::from_shape_fn((32, 32), |(r, c)| {
            if (r + c) % 2 == 0 {
                0
            } else {
                255
            }
        }))
        .unwrap();
        assert_eq!(estimate_noise_level(&grid), 1.0);
    }
}
