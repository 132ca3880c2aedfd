#[allow(dead_code)]
mod common;

use astroslide_core::detection::{dilate, StructuringElement};
use astroslide_core::frame::Mask;
use astroslide_core::stars::{
    add_star_spikes, reduce_stars, remove_stars_inpaint, InpaintMethod, SpikeParams,
};

fn blob_on_flat() -> (astroslide_core::frame::PixelGrid, Mask) {
    let grid = common::grid_from_fn(30, 30, |r, c| {
        if (14..17).contains(&r) && (14..17).contains(&c) {
            [255, 240, 230]
        } else {
            [40, 40, 40]
        }
    });
    let mut mask = Mask::zeros((30, 30));
    for r in 14..17 {
        for c in 14..17 {
            mask[[r, c]] = 255;
        }
    }
    let mask = dilate(&mask, &StructuringElement::ellipse(3, 3));
    (grid, mask)
}

// ---------------------------------------------------------------------------
// Inpainting
// ---------------------------------------------------------------------------

#[test]
fn test_inpaint_fills_from_surroundings() {
    let (grid, mask) = blob_on_flat();
    for method in [InpaintMethod::Telea, InpaintMethod::NavierStokes] {
        let out = remove_stars_inpaint(&grid, &mask, method, 3);
        for r in 13..18 {
            for c in 13..18 {
                let px = out.pixel(r, c);
                assert!(px.iter().all(|&v| (38..=42).contains(&v)), "{method} {r},{c} {px:?}");
            }
        }
        assert_eq!(out.pixel(0, 0), [40, 40, 40]);
    }
}

#[test]
fn test_inpaint_with_empty_mask_is_identity() {
    let (grid, _) = blob_on_flat();
    let empty = Mask::zeros((30, 30));
    assert_eq!(
        remove_stars_inpaint(&grid, &empty, InpaintMethod::Telea, 3),
        grid
    );
}

#[test]
fn test_inpaint_method_names() {
    assert_eq!("ns".parse::<InpaintMethod>().unwrap(), InpaintMethod::NavierStokes);
    assert_eq!("telea".parse::<InpaintMethod>().unwrap(), InpaintMethod::Telea);
    assert_eq!(InpaintMethod::NavierStokes.to_string(), "ns");
    assert!("patchmatch".parse::<InpaintMethod>().is_err());
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

#[test]
fn test_reduce_with_explicit_mask() {
    let (grid, _) = blob_on_flat();
    let mut mask = Mask::zeros((30, 30));
    mask.slice_mut(ndarray::s![10..21, 10..21]).fill(255);
    let out = reduce_stars(&grid, Some(&mask), 1.0, false);
    assert_eq!(out.pixel(15, 15), [40, 40, 40]);
    assert_eq!(out.pixel(2, 2), [40, 40, 40]);
}

#[test]
fn test_core_preservation_keeps_some_color() {
    let grid = common::grid_from_fn(60, 60, |r, c| {
        if (27..34).contains(&r) && (27..34).contains(&c) {
            [255, 200, 120]
        } else {
            [10, 10, 10]
        }
    });
    let kept = reduce_stars(&grid, None, 0.5, true);
    let plain = reduce_stars(&grid, None, 0.5, false);
    assert!(kept.pixel(30, 30)[0] > plain.pixel(30, 30)[0]);
}

// ---------------------------------------------------------------------------
// Spikes
// ---------------------------------------------------------------------------

#[test]
fn test_spikes_follow_diagonals() {
    let grid = common::grid_from_fn(64, 64, |r, c| {
        if (30..34).contains(&r) && (30..34).contains(&c) {
            [250, 250, 250]
        } else {
            [0, 0, 0]
        }
    });
    let out = add_star_spikes(&grid, &SpikeParams::default());
    assert!(out.pixel(40, 40)[0] > 10);
    assert!(out.pixel(23, 40)[0] > 10);
    assert_eq!(out.pixel(31, 45), [0, 0, 0]);
    assert_eq!(out.pixel(45, 31), [0, 0, 0]);
}

#[test]
fn test_spikes_skip_black_frame() {
    let grid = common::flat_grid(16, 16, [0, 0, 0]);
    assert_eq!(add_star_spikes(&grid, &SpikeParams::default()), grid);
}

#[test]
fn test_zero_spikes_is_identity() {
    let grid = common::star_field(32, 32, &[(10, 10)], 3);
    let params = SpikeParams {
        num_spikes: 0,
        ..SpikeParams::default()
    };
    assert_eq!(add_star_spikes(&grid, &params), grid);
}
