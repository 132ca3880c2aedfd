use ndarray::{Array2, Axis};
use rayon::prelude::*;

use super::gaussian_blur::collect_rows_as;
use crate::consts::COLOR_CHANNEL_COUNT;
use crate::frame::PixelGrid;

/// Per-channel median filter with a `ksize x ksize` square window.
///
/// Borders replicate the edge pixel. Uses a sliding 256-bin histogram so the
/// cost per pixel is linear in `ksize`, not quadratic.
pub fn median_blur(grid: &PixelGrid, ksize: usize) -> PixelGrid {
    let ksize = ksize.max(1) | 1;
    if ksize == 1 {
        return grid.clone();
    }

    let (h, w) = grid.dim();
    let channels: Vec<Array2<u8>> = (0..COLOR_CHANNEL_COUNT)
        .into_par_iter()
        .map(|c| {
            let plane = grid.data().index_axis(Axis(2), c).to_owned();
            median_blur_plane(&plane, ksize)
        })
        .collect();

    PixelGrid::from_shape_fn(h, w, |(row, col, c)| channels[c][[row, col]])
}

/// Median filter a single 8-bit plane.
pub fn median_blur_plane(plane: &Array2<u8>, ksize: usize) -> Array2<u8> {
    let (h, w) = plane.dim();
    let radius = (ksize / 2) as isize;
    let rank = (ksize * ksize) / 2;

    let at = |row: isize, col: isize| -> u8 {
        let r = row.clamp(0, h as isize - 1) as usize;
        let c = col.clamp(0, w as isize - 1) as usize;
        plane[[r, c]]
    };

    let row_fn = |row: usize| -> Vec<u8> {
        let row = row as isize;
        let mut hist = [0u32; 256];
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                hist[at(row + dr, dc) as usize] += 1;
            }
        }

        let mut out = Vec::with_capacity(w);
        for col in 0..w as isize {
            if col > 0 {
                for dr in -radius..=radius {
                    hist[at(row + dr, col - radius - 1) as usize] -= 1;
                    hist[at(row + dr, col + radius) as usize] += 1;
                }
            }
            out.push(histogram_rank(&hist, rank));
        }
        out
    };

    collect_rows_as(h, w, row_fn)
}

fn histogram_rank(hist: &[u32; 256], rank: usize) -> u8 {
    let mut cumulative = 0usize;
    for (value, &count) in hist.iter().enumerate() {
        cumulative += count as usize;
        if cumulative > rank {
            return value as u8;
        }
    }
    255
}
