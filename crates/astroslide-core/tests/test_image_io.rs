#[allow(dead_code)]
mod common;

use astroslide_core::error::AstroError;
use astroslide_core::io::{
    decode_bytes, decode_fits_bytes, encode, is_accepted_name, load_rgb, read_fits, save_rgb,
};
use astroslide_core::pipeline::OutputFormat;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[test]
fn test_png_round_trip_is_lossless() {
    let grid = common::textured_grid(17, 9, 10, 200);
    let bytes = encode(&grid, OutputFormat::Png).unwrap();
    let decoded = decode_bytes(&bytes, "out.png").unwrap();
    assert_eq!(decoded, grid);
}

#[test]
fn test_tiff_round_trip_through_file() {
    let grid = common::textured_grid(12, 15, 0, 250);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enhanced.tiff");

    save_rgb(&grid, &path, OutputFormat::Tiff).unwrap();
    let loaded = load_rgb(&path).unwrap();
    assert_eq!(loaded, grid);
}

#[test]
fn test_jpeg_round_trip_is_close() {
    let grid = common::flat_grid(16, 16, [90, 140, 200]);
    let bytes = encode(&grid, OutputFormat::Jpeg).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = decode_bytes(&bytes, "out.jpg").unwrap();
    assert_eq!(decoded.dim(), grid.dim());
    for (a, b) in decoded.data().iter().zip(grid.data().iter()) {
        assert!((i32::from(*a) - i32::from(*b)).abs() <= 3);
    }
}

#[test]
fn test_output_format_metadata() {
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
    assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    assert_eq!(OutputFormat::Tiff.name(), "TIFF");
    assert_eq!("tif".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
    assert!(matches!(
        "bmp".parse::<OutputFormat>(),
        Err(AstroError::UnsupportedFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn test_decode_rejects_oversized_input() {
    let bytes = vec![0u8; 50 * 1024 * 1024 + 1];
    let err = decode_bytes(&bytes, "huge.png").unwrap_err();
    assert!(matches!(err, AstroError::TooLarge { .. }));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(decode_bytes(b"not an image", "x.png").is_err());
}

#[test]
fn test_accepted_names() {
    assert!(is_accepted_name("m42.FITS"));
    assert!(is_accepted_name("moon.tif"));
    assert!(!is_accepted_name("notes.txt"));
    assert!(!is_accepted_name("no_extension"));
}

// ---------------------------------------------------------------------------
// FITS
// ---------------------------------------------------------------------------

#[test]
fn test_fits_16bit_gray_is_normalized_and_replicated() {
    let values: [i16; 6] = [-100, 0, 100, 200, 300, 400];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = common::build_fits(16, &[3, 2], &[], &data);

    let grid = decode_fits_bytes(&bytes).unwrap();
    assert_eq!((grid.width(), grid.height()), (3, 2));
    assert_eq!(grid.pixel(0, 0), [0, 0, 0]);
    assert_eq!(grid.pixel(1, 2), [255, 255, 255]);
    assert_eq!(grid.pixel(0, 2), [102, 102, 102]);
}

#[test]
fn test_fits_bzero_applies_before_normalization() {
    let raw: [i16; 2] = [-32768, 32767];
    let data: Vec<u8> = raw.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = common::build_fits(16, &[2, 1], &["BZERO   =                32768"], &data);
    let grid = decode_fits_bytes(&bytes).unwrap();
    assert_eq!(grid.pixel(0, 0), [0, 0, 0]);
    assert_eq!(grid.pixel(0, 1), [255, 255, 255]);
}

#[test]
fn test_fits_8bit_planar_rgb_is_kept_as_is() {
    // Three 2x1 planes: R, G, B.
    let data = [10u8, 20, 30, 40, 50, 60];
    let bytes = common::build_fits(8, &[2, 1, 3], &[], &data);
    let grid = decode_fits_bytes(&bytes).unwrap();
    assert_eq!(grid.pixel(0, 0), [10, 30, 50]);
    assert_eq!(grid.pixel(0, 1), [20, 40, 60]);
}

#[test]
fn test_fits_float_nan_maps_to_black() {
    let values = [0.5f32, f32::NAN, 1.5, 1.0];
    let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let bytes = common::build_fits(-32, &[2, 2], &[], &data);
    let grid = decode_fits_bytes(&bytes).unwrap();
    assert_eq!(grid.pixel(0, 0), [0, 0, 0]);
    assert_eq!(grid.pixel(0, 1), [0, 0, 0]);
    assert_eq!(grid.pixel(1, 0), [255, 255, 255]);
    assert_eq!(grid.pixel(1, 1), [128, 128, 128]);
}

#[test]
fn test_fits_file_is_memory_mapped() {
    let data = [0u8, 255, 128, 64];
    let bytes = common::build_fits(8, &[2, 2], &[], &data);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.fits");
    std::fs::write(&path, &bytes).unwrap();

    let via_mmap = read_fits(&path).unwrap();
    let via_load = load_rgb(&path).unwrap();
    assert_eq!(via_mmap, via_load);
    assert_eq!(via_mmap.pixel(1, 0), [128, 128, 128]);
}

#[test]
fn test_fits_truncated_data_is_rejected() {
    let mut bytes = common::build_fits(16, &[64, 64], &[], &[]);
    bytes.truncate(2880);
    assert!(matches!(
        decode_fits_bytes(&bytes),
        Err(AstroError::InvalidFits(_))
    ));
}

#[test]
fn test_fits_missing_simple_is_rejected() {
    assert!(decode_fits_bytes(&[0u8; 2880]).is_err());
}

#[test]
fn test_fits_overflowing_axes_are_rejected() {
    let bytes = common::build_fits(-64, &[2147483647, 2147483647, 3], &[], &[]);
    match decode_fits_bytes(&bytes) {
        Err(AstroError::InvalidFits(msg)) => assert!(msg.contains("overflow"), "{msg}"),
        other => panic!("expected InvalidFits, got {other:?}"),
    }
}

#[test]
fn test_fits_huge_axes_without_data_are_truncated() {
    let bytes = common::build_fits(16, &[100_000, 100_000], &[], &[]);
    assert!(matches!(
        decode_fits_bytes(&bytes),
        Err(AstroError::InvalidFits(_))
    ));
}
