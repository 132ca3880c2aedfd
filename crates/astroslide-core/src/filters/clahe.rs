use ndarray::Array2;

use super::border::reflect_101;
use super::gaussian_blur::collect_rows;
use crate::frame::quantize;

const BINS: usize = 256;

/// Contrast-limited adaptive histogram equalization of an 8-bit plane.
///
/// The plane is split into `tiles.0 x tiles.1` tiles (columns x rows). Each
/// tile's histogram is clipped at `clip_limit * tile_area / 256` counts, the
/// excess is redistributed uniformly, and the resulting equalization curves
/// are bilinearly interpolated between tile centers.
///
/// A non-positive `clip_limit` disables clipping (plain AHE).
pub fn clahe(plane: &Array2<u8>, clip_limit: f32, tiles: (usize, usize)) -> Array2<u8> {
    let (h, w) = plane.dim();
    let tiles_x = tiles.0.clamp(1, w);
    let tiles_y = tiles.1.clamp(1, h);
    let tile_w = w.div_ceil(tiles_x);
    let tile_h = h.div_ceil(tiles_y);
    let tile_area = tile_w * tile_h;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / BINS as f32) as usize).max(1)
    } else {
        usize::MAX
    };

    let luts: Vec<[f32; BINS]> = (0..tiles_y * tiles_x)
        .map(|idx| {
            let (ty, tx) = (idx / tiles_x, idx % tiles_x);
            let mut hist = [0usize; BINS];
            for row in ty * tile_h..(ty + 1) * tile_h {
                let r = reflect_101(row as isize, h);
                for col in tx * tile_w..(tx + 1) * tile_w {
                    hist[plane[[r, reflect_101(col as isize, w)]] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);
            equalization_lut(&hist, tile_area)
        })
        .collect();

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;

    let out = collect_rows(h, w, |row| {
        let tyf = row as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(tiles_y as isize - 1) as usize;
        let ty1 = ty1.max(0) as usize;

        (0..w)
            .map(|col| {
                let txf = col as f32 * inv_tw - 0.5;
                let tx1 = txf.floor() as isize;
                let xa = txf - tx1 as f32;
                let tx2 = (tx1 + 1).min(tiles_x as isize - 1) as usize;
                let tx1 = tx1.max(0) as usize;

                let v = plane[[row, col]] as usize;
                let top = luts[ty1 * tiles_x + tx1][v] * (1.0 - xa)
                    + luts[ty1 * tiles_x + tx2][v] * xa;
                let bottom = luts[ty2 * tiles_x + tx1][v] * (1.0 - xa)
                    + luts[ty2 * tiles_x + tx2][v] * xa;
                top * (1.0 - ya) + bottom * ya
            })
            .collect()
    });

    out.mapv(quantize)
}

fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    if clip == usize::MAX {
        return;
    }
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    let redistribute = excess / BINS;
    let residual = excess - redistribute * BINS;
    for count in hist.iter_mut() {
        *count += redistribute;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut remaining = residual;
        let mut bin = 0;
        while bin < BINS && remaining > 0 {
            hist[bin] += 1;
            remaining -= 1;
            bin += step;
        }
    }
}

fn equalization_lut(hist: &[usize; BINS], area: usize) -> [f32; BINS] {
    let scale = 255.0 / area as f32;
    let mut lut = [0.0f32; BINS];
    let mut sum = 0usize;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *slot = f32::from(quantize(sum as f32 * scale));
    }
    lut
}
