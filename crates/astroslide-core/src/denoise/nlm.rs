//! Non-local means denoising.
//!
//! For every search offset the squared patch distance of all pixels is found
//! at once with a summed-area table, so the cost is
//! `O(search^2 * width * height)` independent of the template size.

use ndarray::{s, Array2, Zip};
use tracing::debug;

use crate::color::{lab_to_rgb, rgb_to_lab, LabPlanes};
use crate::consts::{MAX_SAMPLE, PARALLEL_PIXEL_THRESHOLD};
use crate::filters::border::reflect_101;
use crate::filters::box_filter::{integral_image, rect_sum};
use crate::filters::gaussian_blur::collect_rows;
use crate::frame::PixelGrid;

/// Color non-local means.
///
/// Works in L*a*b*: lightness (scaled to 0..255) is filtered with strength
/// `h_luminance`, the two chroma planes jointly with `h_color`.
/// `template` and `search` are odd window sizes (e.g. 7 and 21).
pub fn nlm_denoise_colored(
    grid: &PixelGrid,
    h_luminance: f32,
    h_color: f32,
    template: usize,
    search: usize,
) -> PixelGrid {
    debug!(h_luminance, h_color, template, search, "non-local means");
    let lab = rgb_to_lab(grid);
    let l_scale = MAX_SAMPLE / 100.0;
    let lightness = lab.l.mapv(|v| v * l_scale);

    let (l_out, ab_out) = rayon::join(
        || nlm_planes(&[lightness], h_luminance, template, search),
        || nlm_planes(&[lab.a, lab.b], h_color, template, search),
    );

    let mut l_out = l_out.into_iter();
    let mut ab_out = ab_out.into_iter();
    match (l_out.next(), ab_out.next(), ab_out.next()) {
        (Some(l), Some(a), Some(b)) => lab_to_rgb(&LabPlanes {
            l: l.mapv(|v| v / l_scale),
            a,
            b,
        }),
        _ => grid.clone(),
    }
}

/// Jointly denoise a set of equally shaped planes with one shared weight map.
///
/// Patch distance is the mean squared difference per sample, averaged over
/// planes; weights are `exp(-d / h^2)`.
pub fn nlm_planes(
    planes: &[Array2<f32>],
    h: f32,
    template: usize,
    search: usize,
) -> Vec<Array2<f32>> {
    if planes.is_empty() || h <= 0.0 {
        return planes.to_vec();
    }
    let (height, width) = planes[0].dim();
    let tr = template / 2;
    let sr = search / 2;
    let pad = tr + sr;

    let padded: Vec<Array2<f32>> = planes.iter().map(|p| pad_reflect(p, pad)).collect();
    let norm = 1.0 / ((2 * tr + 1).pow(2) * planes.len()) as f64;
    let inv_h2 = 1.0 / (h as f64 * h as f64);
    let parallel = height * width >= PARALLEL_PIXEL_THRESHOLD;

    let mut weight_sum = Array2::<f32>::zeros((height, width));
    let mut sums: Vec<Array2<f32>> = planes
        .iter()
        .map(|_| Array2::<f32>::zeros((height, width)))
        .collect();

    let diff_h = height + 2 * tr;
    let diff_w = width + 2 * tr;

    for oy in 0..=2 * sr {
        for ox in 0..=2 * sr {
            let diff = Array2::from_shape_fn((diff_h, diff_w), |(y, x)| {
                padded
                    .iter()
                    .map(|p| {
                        let d = p[[y + sr, x + sr]] - p[[y + oy, x + ox]];
                        d * d
                    })
                    .sum::<f32>()
            });
            let table = integral_image(&diff);

            let weights = collect_rows(height, width, |row| {
                (0..width)
                    .map(|col| {
                        let d = rect_sum(&table, row, col, row + 2 * tr, col + 2 * tr) * norm;
                        (-d * inv_h2).exp() as f32
                    })
                    .collect()
            });

            weight_sum += &weights;
            for (sum, p) in sums.iter_mut().zip(&padded) {
                let shifted = p.slice(s![
                    tr + oy..tr + oy + height,
                    tr + ox..tr + ox + width
                ]);
                let zip = Zip::from(sum).and(&weights).and(&shifted);
                if parallel {
                    zip.par_for_each(|acc, &wt, &v| *acc += wt * v);
                } else {
                    zip.for_each(|acc, &wt, &v| *acc += wt * v);
                }
            }
        }
    }

    sums.into_iter()
        .map(|s| {
            Zip::from(&s)
                .and(&weight_sum)
                .map_collect(|&v, &w| if w > 0.0 { v / w } else { 0.0 })
        })
        .collect()
}

/// Pad a plane by `pad` samples on every side, reflecting about the edge sample.
fn pad_reflect(plane: &Array2<f32>, pad: usize) -> Array2<f32> {
    let (h, w) = plane.dim();
    Array2::from_shape_fn((h + 2 * pad, w + 2 * pad), |(y, x)| {
        let sy = reflect_101(y as isize - pad as isize, h);
        let sx = reflect_101(x as isize - pad as isize, w);
        plane[[sy, sx]]
    })
}
