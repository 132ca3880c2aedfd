use super::gaussian_blur::collect_rows_as;
use crate::frame::PixelGrid;

/// Edge-preserving bilateral filter over an RGB grid.
///
/// Neighbors within `diameter / 2` pixels are weighted by spatial distance
/// (`sigma_space`) and by Euclidean color distance (`sigma_color`, in 8-bit
/// units), so smoothing stops at strong edges.
pub fn bilateral_filter(
    grid: &PixelGrid,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> PixelGrid {
    let (h, w) = grid.dim();
    let radius = (diameter / 2).max(1) as isize;
    let [r, g, b] = grid.channels();

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // Precompute the circular spatial window.
    let mut window: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 > (radius * radius) as f32 {
                continue;
            }
            window.push((dy, dx, (d2 * space_coeff).exp()));
        }
    }

    let row_fn = |row: usize| -> Vec<[f32; 3]> {
        (0..w)
            .map(|col| {
                let center = [r[[row, col]], g[[row, col]], b[[row, col]]];
                let mut sum = [0.0f32; 3];
                let mut weight_sum = 0.0f32;

                for &(dy, dx, spatial) in &window {
                    let ny = row as isize + dy;
                    let nx = col as isize + dx;
                    if ny < 0 || ny >= h as isize || nx < 0 || nx >= w as isize {
                        continue;
                    }
                    let (ny, nx) = (ny as usize, nx as usize);
                    let neighbor = [r[[ny, nx]], g[[ny, nx]], b[[ny, nx]]];
                    let dr = neighbor[0] - center[0];
                    let dg = neighbor[1] - center[1];
                    let db = neighbor[2] - center[2];
                    let color_dist_sq = dr * dr + dg * dg + db * db;
                    let weight = spatial * (color_dist_sq * color_coeff).exp();

                    sum[0] += neighbor[0] * weight;
                    sum[1] += neighbor[1] * weight;
                    sum[2] += neighbor[2] * weight;
                    weight_sum += weight;
                }

                if weight_sum > 0.0 {
                    [sum[0] / weight_sum, sum[1] / weight_sum, sum[2] / weight_sum]
                } else {
                    center
                }
            })
            .collect()
    };

    let filtered = collect_rows_as(h, w, row_fn);
    PixelGrid::from_channels(&[
        filtered.mapv(|px| px[0]),
        filtered.mapv(|px| px[1]),
        filtered.mapv(|px| px[2]),
    ])
}
