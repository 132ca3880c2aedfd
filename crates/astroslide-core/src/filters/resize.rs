use ndarray::Array2;

use super::gaussian_blur::collect_rows;
use crate::color::process_channels;
use crate::frame::PixelGrid;

/// Catmull-Rom style coefficient used by the common bicubic resamplers.
const CUBIC_A: f32 = -0.75;

/// Area-averaging resize of an RGB grid to `width x height`.
///
/// Each output pixel is the coverage-weighted mean of the source pixels its
/// footprint overlaps, which avoids aliasing when shrinking.
pub fn resize_area(grid: &PixelGrid, width: usize, height: usize) -> PixelGrid {
    let width = width.max(1);
    let height = height.max(1);
    if grid.dim() == (height, width) {
        return grid.clone();
    }
    let [r, g, b] = grid.channels();
    let planes = [
        resize_area_plane(&r, width, height),
        resize_area_plane(&g, width, height),
        resize_area_plane(&b, width, height),
    ];
    PixelGrid::from_channels(&planes)
}

/// Area-averaging resize of a single float plane.
pub fn resize_area_plane(plane: &Array2<f32>, width: usize, height: usize) -> Array2<f32> {
    let (src_h, src_w) = plane.dim();
    let col_spans = area_spans(src_w, width);
    let row_spans = area_spans(src_h, height);

    collect_rows(height, width, |row| {
        let rows = &row_spans[row];
        col_spans
            .iter()
            .map(|cols| {
                let mut sum = 0.0f32;
                let mut weight = 0.0f32;
                for &(sr, wr) in rows {
                    for &(sc, wc) in cols {
                        let wgt = wr * wc;
                        sum += plane[[sr, sc]] * wgt;
                        weight += wgt;
                    }
                }
                if weight > 0.0 {
                    sum / weight
                } else {
                    0.0
                }
            })
            .collect()
    })
}

/// For each destination index, the source indices it overlaps and the overlap
/// length of each.
fn area_spans(src: usize, dst: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src as f64);
            let mut spans = Vec::new();
            let mut s = start.floor() as usize;
            while (s as f64) < end && s < src {
                let lo = start.max(s as f64);
                let hi = end.min((s + 1) as f64);
                if hi > lo {
                    spans.push((s, (hi - lo) as f32));
                }
                s += 1;
            }
            if spans.is_empty() {
                spans.push((s.min(src - 1), 1.0));
            }
            spans
        })
        .collect()
}

/// Bicubic resize of a float plane (pixel-center aligned, replicated border).
pub fn resize_bicubic_plane(plane: &Array2<f32>, width: usize, height: usize) -> Array2<f32> {
    let (src_h, src_w) = plane.dim();
    let scale_x = src_w as f32 / width as f32;
    let scale_y = src_h as f32 / height as f32;

    let col_taps: Vec<([usize; 4], [f32; 4])> = (0..width)
        .map(|x| cubic_taps((x as f32 + 0.5) * scale_x - 0.5, src_w))
        .collect();

    collect_rows(height, width, |row| {
        let (ys, wy) = cubic_taps((row as f32 + 0.5) * scale_y - 0.5, src_h);
        col_taps
            .iter()
            .map(|(xs, wx)| {
                let mut acc = 0.0f32;
                for (j, &sy) in ys.iter().enumerate() {
                    let mut line = 0.0f32;
                    for (i, &sx) in xs.iter().enumerate() {
                        line += plane[[sy, sx]] * wx[i];
                    }
                    acc += line * wy[j];
                }
                acc
            })
            .collect()
    })
}

/// Bicubic resize of every channel of a grid.
pub fn resize_bicubic(grid: &PixelGrid, width: usize, height: usize) -> PixelGrid {
    process_channels(grid, |plane| resize_bicubic_plane(plane, width, height))
}

fn cubic_taps(pos: f32, len: usize) -> ([usize; 4], [f32; 4]) {
    let base = pos.floor();
    let t = pos - base;
    let base = base as isize;
    let last = len as isize - 1;
    let idx = [
        (base - 1).clamp(0, last) as usize,
        base.clamp(0, last) as usize,
        (base + 1).clamp(0, last) as usize,
        (base + 2).clamp(0, last) as usize,
    ];
    (idx, cubic_weights(t))
}

fn cubic_weights(t: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let w2 = ((a + 2.0) * (1.0 - t) - (a + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}
