#[allow(dead_code)]
mod common;

use astroslide_core::denoise::adaptive::adaptive_strengths;
use astroslide_core::denoise::{
    adaptive_denoise, astro_denoise, estimate_noise_level, nlm_denoise_colored, wavelet_denoise,
};
use astroslide_core::frame::PixelGrid;
use astroslide_core::stats::{mean_stddev, plane_mean_stddev};

#[test]
fn test_noise_level_of_flat_grid_is_zero() {
    let grid = common::flat_grid(32, 32, [90, 90, 90]);
    assert_eq!(estimate_noise_level(&grid), 0.0);
}

#[test]
fn test_noise_level_orders_inputs() {
    let quiet = common::textured_grid(48, 48, 100, 4);
    let loud = common::textured_grid(48, 48, 40, 120);
    let q = estimate_noise_level(&quiet);
    let l = estimate_noise_level(&loud);
    assert!(q < l, "{q} vs {l}");
    assert!((0.0..=1.0).contains(&l));
}

#[test]
fn test_adaptive_strengths_clamp() {
    assert_eq!(adaptive_strengths(1.0, 10.0), (15, 12));
    assert_eq!(adaptive_strengths(0.0, 1.0), (1, 1));
    assert_eq!(adaptive_strengths(0.5, 4.0), (6, 4));
}

#[test]
fn test_wavelet_denoise_keeps_flat_grid() {
    let grid = common::flat_grid(24, 24, [50, 100, 150]);
    assert_eq!(wavelet_denoise(&grid, 1.5, true), grid);
    assert_eq!(wavelet_denoise(&grid, 1.5, false), grid);
}

#[test]
fn test_wavelet_denoise_reduces_variance() {
    let grid = common::textured_grid(48, 48, 60, 60);
    let out = wavelet_denoise(&grid, 1.5, false);
    let before = plane_mean_stddev(&grid.channel(1)).1;
    let after = plane_mean_stddev(&out.channel(1)).1;
    assert!(after < before, "{after} >= {before}");
}

#[test]
fn test_nlm_reduces_variance() {
    let grid = common::textured_grid(32, 32, 60, 40);
    let out = nlm_denoise_colored(&grid, 10.0, 10.0, 7, 15);
    let before = plane_mean_stddev(&grid.channel(0)).1;
    let after = plane_mean_stddev(&out.channel(0)).1;
    assert!(after < before);
}

#[test]
fn test_adaptive_and_astro_preserve_shape() {
    let grid = common::star_field(30, 22, &[(4, 4), (15, 20)], 2);
    assert_eq!(adaptive_denoise(&grid, 3.0).dim(), grid.dim());
    for (stars, edges) in [(true, true), (true, false), (false, true), (false, false)] {
        let out = astro_denoise(&grid, 1.0, stars, edges);
        assert_eq!(out.dim(), grid.dim());
    }
}

#[test]
fn test_astro_denoise_keeps_flat_grid() {
    let grid = common::flat_grid(20, 20, [30, 30, 30]);
    assert_eq!(astro_denoise(&grid, 1.2, true, true), grid);
}

/// Gray noise (100..117) in the left two thirds, a 40/160 checkerboard in the right third.
fn noise_and_texture() -> PixelGrid {
    common::grid_from_fn(48, 24, |r, c| {
        let v = if c < 32 {
            100 + ((r * 37 + c * 61 + (r * c) % 13) % 17) as u8
        } else if (r + c) % 2 == 0 {
            160
        } else {
            40
        };
        [v, v, v]
    })
}

fn region_std(grid: &PixelGrid, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> f64 {
    let green = grid.channel(1);
    let values = rows.flat_map(|r| cols.clone().map(move |c| (r, c)));
    mean_stddev(values.map(|(r, c)| green[[r, c]])).1
}

fn region_mean_abs_diff(
    a: &PixelGrid,
    b: &PixelGrid,
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
) -> f64 {
    let mut sum = 0.0;
    let mut n = 0.0;
    for r in rows {
        for c in cols.clone() {
            sum += (f64::from(a.pixel(r, c)[1]) - f64::from(b.pixel(r, c)[1])).abs();
            n += 1.0;
        }
    }
    sum / n
}

#[test]
fn test_visu_shrink_removes_more_noise_than_bayes() {
    let grid = noise_and_texture();
    let bayes = wavelet_denoise(&grid, 1.0, true);
    let visu = wavelet_denoise(&grid, 1.0, false);
    let noisy = region_std(&grid, 2..22, 2..26);
    let kept = region_std(&bayes, 2..22, 2..26);
    let removed = region_std(&visu, 2..22, 2..26);
    assert!(removed < kept, "visu {removed} vs bayes {kept}");
    assert!(removed < noisy);
}

#[test]
fn test_edge_aware_smooths_flat_areas_and_keeps_texture() {
    let grid = noise_and_texture();
    let wavelet_only = astro_denoise(&grid, 1.0, false, false);
    let edge_aware = astro_denoise(&grid, 1.0, false, true);

    let flat_rows = 4..20;
    let flat_cols = 4..26;
    assert!(
        region_std(&edge_aware, flat_rows.clone(), flat_cols.clone())
            < region_std(&wavelet_only, flat_rows.clone(), flat_cols.clone())
    );

    let flat_change = region_mean_abs_diff(&edge_aware, &wavelet_only, flat_rows, flat_cols);
    let texture_change = region_mean_abs_diff(&edge_aware, &wavelet_only, 4..20, 38..44);
    assert!(flat_change > 0.0);
    assert!(texture_change < 1.0, "texture moved by {texture_change}");
    assert!(texture_change < flat_change);
}

#[test]
fn test_star_protection_keeps_star_cores() {
    let stars = [(10usize, 10usize), (25, 28)];
    let grid = common::grid_from_fn(40, 40, |r, c| {
        let on_star = stars
            .iter()
            .any(|&(sr, sc)| (sr..sr + 3).contains(&r) && (sc..sc + 3).contains(&c));
        let v = if on_star {
            250
        } else {
            40 + ((r * 37 + c * 61 + (r * c) % 13) % 31) as u8
        };
        [v, v, v]
    });

    let protected = astro_denoise(&grid, 3.0, true, false);
    let unprotected = astro_denoise(&grid, 3.0, false, false);

    for (sr, sc) in stars {
        let (r, c) = (sr + 1, sc + 1);
        let orig = i32::from(grid.pixel(r, c)[0]);
        let kept = (i32::from(protected.pixel(r, c)[0]) - orig).abs();
        let lost = (i32::from(unprotected.pixel(r, c)[0]) - orig).abs();
        assert!(kept < lost, "star at ({r}, {c}): {kept} vs {lost}");
    }
    // Sky far from both stars is untouched by the protection step.
    assert_eq!(protected.pixel(36, 3), unprotected.pixel(36, 3));
    assert_eq!(protected.pixel(2, 38), unprotected.pixel(2, 38));
}
