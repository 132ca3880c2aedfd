#[allow(dead_code)]
mod common;

use ndarray::Array2;

use astroslide_core::detection::{
    connected_components, count_stars, create_star_mask, detect_stars_aggressive, dilate, erode,
    StructuringElement,
};
use astroslide_core::frame::{mask_count, Mask};

#[test]
fn test_ellipse_5x5_matches_disk_shape() {
    let e = StructuringElement::ellipse(5, 5);
    assert_eq!(e.len(), 17);
    assert!(e.contains(-2, 0));
    assert!(!e.contains(-2, -1));
    assert!(e.contains(-1, -2));
}

#[test]
fn test_ellipse_3x3_is_cross() {
    let e = StructuringElement::ellipse(3, 3);
    assert_eq!(e.len(), 5);
    assert!(!e.contains(1, 1));
}

#[test]
fn test_dilate_then_erode_single_pixel() {
    let mut mask = Mask::zeros((11, 11));
    mask[[5, 5]] = 255;
    let e = StructuringElement::ellipse(5, 5);
    let grown = dilate(&mask, &e);
    assert_eq!(mask_count(&grown), 17);
    assert_eq!(erode(&grown, &e), mask);
}

#[test]
fn test_components_are_eight_connected() {
    let mut mask = Array2::<u8>::zeros((5, 5));
    mask[[0, 0]] = 255;
    mask[[1, 1]] = 255;
    mask[[0, 3]] = 255;
    mask[[4, 4]] = 255;
    let comps = connected_components(&mask);
    assert_eq!(comps.len(), 3);
    assert_eq!(comps[0].area, 2);
    assert_eq!(comps[0].centroid, (0.5, 0.5));
    assert_eq!(comps[1].bbox, (0, 0, 3, 3));
    assert_eq!(comps[2].pixels, vec![(4, 4)]);
}

#[test]
fn test_star_mask_counts_separate_stars() {
    let grid = common::star_field(40, 40, &[(5, 6), (20, 25), (30, 8)], 3);
    let mask = create_star_mask(&grid, 2.5);
    assert_eq!(count_stars(&mask), 3);
    assert_eq!(mask[[21, 26]], 255);
    assert_eq!(mask[[0, 39]], 0);
}

#[test]
fn test_aggressive_detection_covers_strict_mask() {
    let grid = common::star_field(48, 48, &[(10, 10), (30, 30)], 3);
    let strict = create_star_mask(&grid, 2.5);
    let loose = detect_stars_aggressive(&grid, 0.7);
    for (s, l) in strict.iter().zip(loose.iter()) {
        if *s > 0 {
            assert!(*l > 0);
        }
    }
}

#[test]
fn test_no_stars_in_black_frame() {
    let grid = common::flat_grid(32, 32, [0, 0, 0]);
    assert_eq!(mask_count(&detect_stars_aggressive(&grid, 1.0)), 0);
    assert_eq!(mask_count(&create_star_mask(&grid, 2.5)), 0);
}
