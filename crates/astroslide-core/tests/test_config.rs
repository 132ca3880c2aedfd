use std::path::PathBuf;

use astroslide_core::error::AstroError;
use astroslide_core::pipeline::{EnhanceConfig, EnhanceRequest, EnhanceStage, OutputFormat};
use astroslide_core::presets::PresetKind;
use astroslide_core::stars::SpikeParams;

#[test]
fn test_enhance_config_defaults_from_minimal_toml() {
    let config: EnhanceConfig = toml::from_str(
        r#"
input = "m42.fits"
output = "m42.png"
"#,
    )
    .unwrap();
    assert_eq!(config.input, PathBuf::from("m42.fits"));
    assert_eq!(config.preset, PresetKind::General);
    assert_eq!(config.intensity, 0.75);
    assert!(!config.star_spikes);
    assert_eq!(config.format, None);
    assert_eq!(config.output_format().unwrap(), OutputFormat::Png);
}

#[test]
fn test_enhance_config_full_toml() {
    let config: EnhanceConfig = toml::from_str(
        r#"
input = "moon.tif"
output = "moon_out"
preset = "moon_hdr"
intensity = 1.4
star_spikes = true
format = "tiff"
"#,
    )
    .unwrap();
    assert_eq!(config.preset, PresetKind::MoonHdr);
    assert_eq!(config.output_format().unwrap(), OutputFormat::Tiff);

    let request = config.request();
    assert_eq!(request.intensity, 1.0);
    assert!(request.star_spikes);
}

#[test]
fn test_unknown_preset_in_toml_is_rejected() {
    let parsed: Result<EnhanceConfig, _> = toml::from_str(
        r#"
input = "a.png"
output = "b.png"
preset = "lucky_imaging"
"#,
    );
    assert!(parsed.is_err());
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let config = EnhanceConfig::default();
    let text = toml::to_string(&config).unwrap();
    let back: EnhanceConfig = toml::from_str(&text).unwrap();
    assert_eq!(back.preset, config.preset);
    assert_eq!(back.output, config.output);
    assert_eq!(back.output_format().unwrap(), OutputFormat::Jpeg);
}

#[test]
fn test_request_json_shape() {
    let request = EnhanceRequest::new(PresetKind::StarCluster, 0.5, false);
    let json = serde_json::to_value(request).unwrap();
    assert_eq!(json["preset"], "star_cluster");
    assert_eq!(json["intensity"], 0.5);

    let parsed: EnhanceRequest = serde_json::from_str(r#"{"preset":"nebula"}"#).unwrap();
    assert_eq!(parsed.preset, PresetKind::Nebula);
    assert_eq!(parsed.intensity, 0.75);
}

#[test]
fn test_output_format_from_path() {
    assert_eq!(OutputFormat::from_path("a.JPG".as_ref()).unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_path("a.tif".as_ref()).unwrap(), OutputFormat::Tiff);
    assert_eq!(OutputFormat::from_path("x.TIF".as_ref()).unwrap(), OutputFormat::Tiff);
}

#[test]
fn test_output_format_rejects_unknown_extensions() {
    for name in ["out.bmp", "out", "out.fits"] {
        assert!(
            matches!(
                OutputFormat::from_path(name.as_ref()),
                Err(AstroError::UnsupportedFormat(_))
            ),
            "{name}"
        );
    }
}

#[test]
fn test_config_without_format_rejects_unknown_output() {
    let config: EnhanceConfig = toml::from_str(
        r#"
input = "in.fits"
output = "out.bmp"
"#,
    )
    .unwrap();
    assert!(matches!(
        config.output_format(),
        Err(AstroError::UnsupportedFormat(_))
    ));

    let explicit: EnhanceConfig = toml::from_str(
        r#"
input = "in.fits"
output = "out.bmp"
format = "png"
"#,
    )
    .unwrap();
    assert_eq!(explicit.output_format().unwrap(), OutputFormat::Png);
}

#[test]
fn test_spike_params_partial_override() {
    let params: SpikeParams = toml::from_str("num_spikes = 6").unwrap();
    assert_eq!(params.num_spikes, 6);
    assert_eq!(params.length, SpikeParams::default().length);
}

#[test]
fn test_stage_display() {
    assert_eq!(EnhanceStage::Enhancing.to_string(), "Running preset");
    assert_eq!(EnhanceStage::Encoding.to_string(), "Encoding output");
}
