use astroslide_core::frame::PixelGrid;

/// Uniform grid.
pub fn flat_grid(width: usize, height: usize, rgb: [u8; 3]) -> PixelGrid {
    PixelGrid::filled(width, height, rgb).unwrap()
}

/// Build a grid from a per-pixel color function `f(row, col)`.
pub fn grid_from_fn<F>(width: usize, height: usize, f: F) -> PixelGrid
where
    F: Fn(usize, usize) -> [u8; 3],
{
    let mut samples = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            samples.extend_from_slice(&f(row, col));
        }
    }
    PixelGrid::from_raw(width, height, samples).unwrap()
}

/// Deterministic low-amplitude texture in [base, base + amplitude).
pub fn textured_grid(width: usize, height: usize, base: u8, amplitude: u8) -> PixelGrid {
    grid_from_fn(width, height, |r, c| {
        let v = |k: usize| base + ((r * 37 + c * 61 + k * 17 + (r * c) % 13) % amplitude as usize) as u8;
        [v(0), v(1), v(2)]
    })
}

/// Dark textured sky with a few bright square stars of side `size`.
pub fn star_field(width: usize, height: usize, stars: &[(usize, usize)], size: usize) -> PixelGrid {
    grid_from_fn(width, height, |r, c| {
        let on_star = stars
            .iter()
            .any(|&(sr, sc)| r >= sr && r < sr + size && c >= sc && c < sc + size);
        if on_star {
            [250, 245, 235]
        } else {
            let n = ((r * 31 + c * 17) % 7) as u8;
            [12 + n, 14 + n, 18 + n]
        }
    })
}

/// Bright disk of radius `radius` on a near-black sky.
pub fn moon_disk(size: usize, radius: f32) -> PixelGrid {
    let center = size as f32 / 2.0;
    grid_from_fn(size, size, |r, c| {
        let dy = r as f32 - center;
        let dx = c as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            let crater = ((r * 7 + c * 3) % 40) as u8;
            [140 + crater, 135 + crater, 128 + crater]
        } else {
            [4, 4, 5]
        }
    })
}

/// Pad a header card to 80 bytes.
fn card(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(80, b' ');
    bytes
}

/// Minimal FITS primary HDU with the given axes and big-endian data bytes.
pub fn build_fits(bitpix: i32, axes: &[usize], extra_cards: &[&str], data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend(card(&format!("{:<8}= {:>20}", "SIMPLE", "T")));
    buf.extend(card(&format!("{:<8}= {:>20}", "BITPIX", bitpix)));
    buf.extend(card(&format!("{:<8}= {:>20}", "NAXIS", axes.len())));
    for (i, n) in axes.iter().enumerate() {
        buf.extend(card(&format!("{:<8}= {:>20}", format!("NAXIS{}", i + 1), n)));
    }
    for extra in extra_cards {
        buf.extend(card(extra));
    }
    buf.extend(card("END"));
    buf.resize(buf.len().div_ceil(2880) * 2880, b' ');

    buf.extend_from_slice(data);
    buf.resize(buf.len().div_ceil(2880) * 2880, 0);
    buf
}
