use ndarray::Array2;

use super::gaussian_blur::collect_rows;

/// Summed-area table with a zero guard row/column: shape `(h + 1, w + 1)`.
pub(crate) fn integral_image(data: &Array2<f32>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut table = Array2::<f64>::zeros((h + 1, w + 1));
    for row in 0..h {
        let mut row_sum = 0.0f64;
        for col in 0..w {
            row_sum += data[[row, col]] as f64;
            table[[row + 1, col + 1]] = table[[row, col + 1]] + row_sum;
        }
    }
    table
}

/// Sum over the inclusive rectangle `[r0, r1] x [c0, c1]`.
#[inline]
pub(crate) fn rect_sum(table: &Array2<f64>, r0: usize, c0: usize, r1: usize, c1: usize) -> f64 {
    table[[r1 + 1, c1 + 1]] - table[[r0, c1 + 1]] - table[[r1 + 1, c0]] + table[[r0, c0]]
}

/// Mean over a `ksize x ksize` window, shrunk at the image border.
pub fn box_mean(data: &Array2<f32>, ksize: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = ksize / 2;
    let table = integral_image(data);

    collect_rows(h, w, |row| {
        let r0 = row.saturating_sub(radius);
        let r1 = (row + radius).min(h - 1);
        (0..w)
            .map(|col| {
                let c0 = col.saturating_sub(radius);
                let c1 = (col + radius).min(w - 1);
                let count = ((r1 - r0 + 1) * (c1 - c0 + 1)) as f64;
                (rect_sum(&table, r0, c0, r1, c1) / count) as f32
            })
            .collect()
    })
}

/// Local variance `E[x^2] - E[x]^2` over a `ksize x ksize` window.
pub fn local_variance(data: &Array2<f32>, ksize: usize) -> Array2<f32> {
    let mean = box_mean(data, ksize);
    let squares = data.mapv(|v| v * v);
    let mean_sq = box_mean(&squares, ksize);
    ndarray::Zip::from(&mean_sq)
        .and(&mean)
        .map_collect(|&m2, &m| (m2 - m * m).max(0.0))
}
