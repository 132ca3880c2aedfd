#[allow(dead_code)]
mod common;

use std::sync::{Arc, Mutex};

use astroslide_core::filters::histogram;
use astroslide_core::pipeline::{
    enhance, enhance_reported, enhance_with_preset, preview, preview_dimensions,
    reduce_stars_standalone, EnhanceRequest, EnhanceStage, ProgressReporter,
};
use astroslide_core::presets::PresetKind;
use astroslide_core::stars::reduce_stars;

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

#[test]
fn test_zero_intensity_returns_original() {
    let grid = common::textured_grid(24, 20, 40, 80);
    let out = enhance_with_preset(&grid, "deep_sky", 0.0, false).unwrap();
    assert_eq!(out, grid);
}

#[test]
fn test_full_intensity_matches_unblended_pipeline() {
    let grid = common::textured_grid(24, 20, 40, 80);
    let out = enhance_with_preset(&grid, "general", 1.0, false).unwrap();
    assert_eq!(out, PresetKind::General.run(&grid));
}

#[test]
fn test_half_intensity_interpolates_per_sample() {
    let grid = common::textured_grid(24, 20, 40, 80);
    let full = PresetKind::Nebula.run(&grid);
    let half = enhance_with_preset(&grid, "nebula", 0.5, false).unwrap();

    let o = grid.data();
    let f = full.data();
    for (idx, &v) in half.data().indexed_iter() {
        let expected = (0.5 * f32::from(o[idx]) + 0.5 * f32::from(f[idx])).round();
        assert!((f32::from(v) - expected).abs() <= 1.0, "{idx:?}");
    }
}

#[test]
fn test_out_of_range_intensity_is_clamped() {
    let grid = common::textured_grid(20, 20, 30, 90);
    let high = enhance_with_preset(&grid, "general", 1.7, false).unwrap();
    let one = enhance_with_preset(&grid, "general", 1.0, false).unwrap();
    assert_eq!(high, one);

    let low = enhance_with_preset(&grid, "general", -0.3, false).unwrap();
    let zero = enhance_with_preset(&grid, "general", 0.0, false).unwrap();
    assert_eq!(low, zero);
    assert_eq!(low, grid);
}

#[test]
fn test_request_parse_defaults_and_nan() {
    let req = EnhanceRequest::parse("galaxy", None, false).unwrap();
    assert_eq!(req.preset, PresetKind::Galaxy);
    assert_eq!(req.intensity, 0.75);

    let req = EnhanceRequest::parse("galaxy", Some(f32::NAN), true).unwrap();
    assert_eq!(req.intensity, 0.75);
    assert!(req.star_spikes);
}

#[test]
fn test_star_spikes_only_add_light() {
    let grid = common::star_field(48, 48, &[(22, 22)], 4);
    let plain = enhance_with_preset(&grid, "star_cluster", 1.0, false).unwrap();
    let spiked = enhance_with_preset(&grid, "star_cluster", 1.0, true).unwrap();

    assert_eq!(plain.dim(), spiked.dim());
    for (a, b) in plain.data().iter().zip(spiked.data().iter()) {
        assert!(b >= a);
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<EnhanceStage>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: EnhanceStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_reported_stages_follow_request() {
    let grid = common::textured_grid(16, 16, 30, 60);
    let reporter = Arc::new(RecordingReporter::default());
    let request = EnhanceRequest::new(PresetKind::General, 0.5, true);
    let out = enhance_reported(&grid, &request, reporter.clone());

    assert_eq!(out, enhance(&grid, &request));
    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![
            EnhanceStage::Enhancing,
            EnhanceStage::Blending,
            EnhanceStage::StarSpikes
        ]
    );
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[test]
fn test_preview_dimensions() {
    assert_eq!(preview_dimensions(800, 400), (200, 100));
    assert_eq!(preview_dimensions(300, 1000), (60, 200));
    assert_eq!(preview_dimensions(120, 80), (120, 80));
    assert_eq!(preview_dimensions(5000, 3), (200, 1));
}

#[test]
fn test_preview_shrinks_and_enhances() {
    let grid = common::textured_grid(260, 130, 20, 100);
    let out = preview(&grid, "general").unwrap();
    assert_eq!((out.width(), out.height()), (200, 100));
    assert!(preview(&grid, "nope").is_err());
}

// ---------------------------------------------------------------------------
// Standalone star reduction
// ---------------------------------------------------------------------------

#[test]
fn test_reduce_stars_on_black_is_noop() {
    let grid = common::flat_grid(50, 40, [0, 0, 0]);
    assert_eq!(reduce_stars_standalone(&grid, None), grid);
    assert_eq!(reduce_stars_standalone(&grid, Some(1.0)), grid);
}

#[test]
fn test_reduce_stars_removes_single_square() {
    let grid = common::grid_from_fn(100, 100, |r, c| {
        if (48..53).contains(&r) && (48..53).contains(&c) {
            [255, 255, 255]
        } else {
            [0, 0, 0]
        }
    });
    let out = reduce_stars_standalone(&grid, Some(1.0));

    let mut sum = 0u32;
    for r in 48..53 {
        for c in 48..53 {
            sum += out.pixel(r, c).iter().map(|&v| u32::from(v)).sum::<u32>();
        }
    }
    let mean = sum as f32 / 75.0;
    assert!(mean < 64.0, "center mean {mean}");
    assert_eq!(out.pixel(50, 50), [0, 0, 0]);
}

#[test]
fn test_reduce_stars_amount_is_clamped() {
    let grid = common::star_field(60, 60, &[(20, 20), (40, 35)], 4);
    assert_eq!(
        reduce_stars(&grid, None, 1.6, true),
        reduce_stars(&grid, None, 1.0, true)
    );
    assert_eq!(reduce_stars(&grid, None, -0.4, true), grid);
}

#[test]
fn test_histogram_counts_every_sample() {
    let grid = common::flat_grid(10, 7, [3, 200, 255]);
    let hist = histogram(&grid);
    assert_eq!(hist.total(), 70);
    assert_eq!(hist.red[3], 70);
    assert_eq!(hist.green[200], 70);
    assert_eq!(hist.blue[255], 70);
    assert_eq!(hist.luminance.iter().sum::<u64>(), 70);
}
