#[allow(dead_code)]
mod common;

use ndarray::Array2;

use astroslide_core::filters::{
    bilateral_filter, clahe, gaussian_blur, gaussian_blur_ksize, histogram, median_blur, percentile_stretch,
    resize_area, unsharp_mask,
};
use astroslide_core::stats::plane_mean_stddev;

#[test]
fn test_gaussian_blur_keeps_flat_grid() {
    let grid = common::flat_grid(20, 11, [33, 66, 99]);
    assert_eq!(gaussian_blur(&grid, 2.5), grid);
}

#[test]
fn test_gaussian_blur_reflects_at_border() {
    // Column 0 is bright; with reflect-101 its mirror partner is column 1 (dark).
    let plane = Array2::from_shape_fn((5, 9), |(_, c)| if c == 0 { 100.0 } else { 0.0 });
    let out = gaussian_blur_ksize(&plane, 3);
    let center = 1.0 / (1.0 + 2.0 * (-1.0f32 / (2.0 * 0.8 * 0.8)).exp());
    for row in 0..5 {
        assert!((out[[row, 0]] - 100.0 * center).abs() < 0.01, "{}", out[[row, 0]]);
    }
    assert!((out[[2, 1]] - 100.0 * (1.0 - center) / 2.0).abs() < 0.01);
}

#[test]
fn test_unsharp_mask_keeps_flat_grid() {
    let grid = common::flat_grid(16, 16, [120, 60, 200]);
    assert_eq!(unsharp_mask(&grid, 2.0, 1.5, -0.5), grid);
}

#[test]
fn test_unsharp_mask_raises_edge_contrast() {
    let grid = common::grid_from_fn(20, 10, |_, c| if c < 10 { [80; 3] } else { [160; 3] });
    let out = unsharp_mask(&grid, 2.0, 1.5, -0.5);
    assert!(out.pixel(5, 9)[0] < 80);
    assert!(out.pixel(5, 10)[0] > 160);
}

#[test]
fn test_median_blur_removes_hot_pixel() {
    let grid = common::grid_from_fn(9, 9, |r, c| if (r, c) == (4, 4) { [255; 3] } else { [20; 3] });
    let out = median_blur(&grid, 3);
    assert_eq!(out.pixel(4, 4), [20, 20, 20]);
}

#[test]
fn test_bilateral_keeps_flat_grid_and_edges() {
    let flat = common::flat_grid(12, 12, [70, 80, 90]);
    assert_eq!(bilateral_filter(&flat, 9, 75.0, 75.0), flat);

    let edge = common::grid_from_fn(16, 8, |_, c| if c < 8 { [0; 3] } else { [255; 3] });
    let out = bilateral_filter(&edge, 9, 20.0, 75.0);
    assert!(out.pixel(4, 7)[0] < 10);
    assert!(out.pixel(4, 8)[0] > 245);
}

#[test]
fn test_clahe_stretches_low_contrast_ramp() {
    let plane = Array2::from_shape_fn((64, 64), |(_, c)| 100 + (c / 4) as u8);
    let out = clahe(&plane, 4.0, (2, 2));
    let std = |p: &Array2<u8>| plane_mean_stddev(&p.mapv(f32::from)).1;
    assert_eq!(out.dim(), plane.dim());
    assert!(std(&out) > std(&plane));
}

#[test]
fn test_percentile_stretch_fills_range() {
    let grid = common::grid_from_fn(101, 4, |_, c| [50 + c as u8; 3]);
    let out = percentile_stretch(&grid, 0.1, 99.9);
    let ch = out.channel(0);
    let min = ch.iter().copied().fold(f32::MAX, f32::min);
    let max = ch.iter().copied().fold(f32::MIN, f32::max);
    assert!(min <= 1.0);
    assert!(max >= 254.0);
}

#[test]
fn test_percentile_stretch_leaves_flat_channel() {
    let grid = common::grid_from_fn(10, 10, |r, c| [77, (r * 10 + c) as u8, 77]);
    let out = percentile_stretch(&grid, 0.1, 99.9);
    assert!(out.channel(0).iter().all(|&v| v == 77.0));
    assert!(out.channel(2).iter().all(|&v| v == 77.0));
}

#[test]
fn test_resize_area_averages_blocks() {
    let grid = common::grid_from_fn(4, 4, |r, c| match (r / 2, c / 2) {
        (0, 0) => [0, 0, 0],
        (0, 1) => [100, 100, 100],
        (1, 0) => [200, 200, 200],
        _ => [40, 50, 60],
    });
    let out = resize_area(&grid, 2, 2);
    assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    assert_eq!(out.pixel(0, 1), [100, 100, 100]);
    assert_eq!(out.pixel(1, 0), [200, 200, 200]);
    assert_eq!(out.pixel(1, 1), [40, 50, 60]);
}

#[test]
fn test_histogram_luminance_uses_rounded_gray() {
    let grid = common::flat_grid(2, 2, [255, 0, 0]);
    let hist = histogram(&grid);
    assert_eq!(hist.luminance[76], 4);
    assert_eq!(hist.red[255], 4);
    assert_eq!(hist.green[0], 4);
}

#[test]
fn test_histogram_serializes_as_arrays() {
    let grid = common::flat_grid(3, 1, [1, 2, 3]);
    let json = serde_json::to_value(histogram(&grid)).unwrap();
    assert_eq!(json["red"].as_array().unwrap().len(), 256);
    assert_eq!(json["blue"][3], 3);
}
