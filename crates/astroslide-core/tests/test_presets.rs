#[allow(dead_code)]
mod common;

use astroslide_core::color::rgb_to_hsv;
use astroslide_core::error::AstroError;
use astroslide_core::pipeline::enhance_with_preset;
use astroslide_core::presets::{registry, PresetKind, PRESETS};

const EXPECTED_IDS: [&str; 7] = [
    "mineral_moon_subtle",
    "deep_sky",
    "general",
    "moon_hdr",
    "nebula",
    "galaxy",
    "star_cluster",
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn test_registry_has_seven_complete_entries() {
    let entries = registry();
    assert_eq!(entries.len(), 7);
    for (entry, id) in entries.iter().zip(EXPECTED_IDS) {
        assert_eq!(entry.id, id);
        assert!(!entry.name.is_empty());
        assert!(!entry.description.is_empty());
        assert!(!entry.best_for.is_empty());
    }
}

#[test]
fn test_preset_kind_round_trips_through_id() {
    for kind in PresetKind::ALL {
        let parsed: PresetKind = kind.id().parse().unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.id());
    }
}

#[test]
fn test_registry_metadata_text() {
    assert_eq!(PRESETS[0].name, "Mineral Moon (Subtle)");
    assert_eq!(PresetKind::MoonHdr.name(), "Moon HDR");
    assert_eq!(
        PresetKind::General.descriptor().best_for,
        "General astrophotography"
    );
}

#[test]
fn test_unknown_preset_lists_valid_ids() {
    let grid = common::flat_grid(8, 8, [10, 20, 30]);
    let err = enhance_with_preset(&grid, "sharpen_everything", 0.75, false).unwrap_err();
    match err {
        AstroError::UnknownPreset { id, available } => {
            assert_eq!(id, "sharpen_everything");
            assert_eq!(available, EXPECTED_IDS.map(String::from).to_vec());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_preset_ids_are_case_sensitive() {
    assert!("Deep_Sky".parse::<PresetKind>().is_err());
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

#[test]
fn test_every_preset_preserves_shape() {
    let grid = common::textured_grid(33, 29, 30, 60);
    for kind in PresetKind::ALL {
        let out = kind.run(&grid);
        assert_eq!(out.width(), 33, "{kind}");
        assert_eq!(out.height(), 29, "{kind}");
        assert_eq!(out.data().dim().2, 3, "{kind}");
    }
}

#[test]
fn test_every_preset_is_deterministic() {
    let grid = common::star_field(40, 36, &[(5, 6), (20, 25), (30, 8)], 3);
    for kind in PresetKind::ALL {
        let a = kind.run(&grid);
        let b = kind.run(&grid);
        assert_eq!(a, b, "{kind}");
    }
}

#[test]
fn test_general_on_flat_gray_is_near_identity() {
    let grid = common::flat_grid(64, 64, [128, 128, 128]);
    let out = PresetKind::General.run(&grid);

    for c in 0..3 {
        let mean = out.channel(c).mean().unwrap();
        assert!((mean - 128.0).abs() < 1.0, "channel {c} mean {mean}");
    }
    let hsv = rgb_to_hsv(&out);
    assert!(hsv.s.iter().all(|&s| s < 0.01));
}

#[test]
fn test_moon_presets_black_out_sky() {
    let grid = common::moon_disk(48, 14.0);
    for kind in [PresetKind::MineralMoonSubtle, PresetKind::MoonHdr] {
        let out = kind.run(&grid);
        assert_eq!(out.pixel(0, 0), [0, 0, 0], "{kind}");
        assert_eq!(out.pixel(47, 2), [0, 0, 0], "{kind}");
        let center = out.pixel(24, 24);
        assert!(center.iter().any(|&v| v > 50), "{kind} center {center:?}");
    }
}

#[test]
fn test_star_cluster_differs_from_deep_sky() {
    let grid = common::star_field(40, 40, &[(10, 10), (25, 30)], 3);
    let cluster = PresetKind::StarCluster.run(&grid);
    let deep = PresetKind::DeepSky.run(&grid);
    assert_ne!(cluster, deep);
}
