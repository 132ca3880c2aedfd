//! Saturation and value adjustments in HSV.

use tracing::debug;

use crate::color::convert::{hsv_to_rgb_pixel, rgb_to_hsv_pixel};
use crate::color::luma;
use crate::consts::{EPSILON, MAX_SAMPLE};
use crate::frame::{Mask, PixelGrid};
use crate::stats::{mean_stddev, median, percentile};

const ADAPTIVE_MIN: f32 = 1.2;
const ADAPTIVE_MAX: f32 = 1.8;

/// Multiply HSV saturation by `factor`, clipped at full saturation.
pub fn scale_saturation(grid: &PixelGrid, factor: f32) -> PixelGrid {
    map_hsv(grid, |h, s, v| (h, s * factor, v))
}

/// Multiply HSV value by `factor`, clipped at full brightness.
pub fn boost_value(grid: &PixelGrid, factor: f32) -> PixelGrid {
    map_hsv(grid, |h, s, v| (h, s, v * factor))
}

/// Saturation boost that fades out over dark background.
///
/// The boost weight is `clamp((L - t) / (1 - t), 0, 1)^2` for normalized
/// luminance `L` and `background_threshold` `t`, so pixels at or below the
/// threshold are untouched.
pub fn background_protected_saturation(
    grid: &PixelGrid,
    boost: f32,
    background_threshold: f32,
) -> PixelGrid {
    let t = background_threshold.clamp(0.0, 1.0 - EPSILON);
    grid.map_pixels(|[r, g, b]| {
        let lum = luma(r, g, b) / MAX_SAMPLE;
        let ramp = ((lum - t) / (1.0 - t)).clamp(0.0, 1.0);
        let weight = ramp * ramp;
        if weight <= 0.0 {
            return [r, g, b];
        }
        let (h, s, v) = rgb_to_hsv_pixel(r / MAX_SAMPLE, g / MAX_SAMPLE, b / MAX_SAMPLE);
        let s = (s * (1.0 + (boost - 1.0) * weight)).min(1.0);
        let (r, g, b) = hsv_to_rgb_pixel(h, s, v);
        [r * MAX_SAMPLE, g * MAX_SAMPLE, b * MAX_SAMPLE]
    })
}

/// Saturation multiplier adapted to the masked region's color statistics.
///
/// Four factors scale `base_multiplier`:
/// - mean saturation: < 0.15 → 1.3, < 0.25 → 1.15, > 0.4 → 0.85
/// - saturation spread: std > 0.15 → 1.1, < 0.08 → 0.95
/// - brightness: mean value < 0.3 → 1.05, > 0.7 → 0.98
/// - distribution: 75th percentile > 0.5 → 0.9, < 0.2 → 1.1
///
/// The product is clamped to [1.2, 1.8]. An empty mask returns
/// `base_multiplier` unchanged.
pub fn calculate_adaptive_saturation(grid: &PixelGrid, mask: &Mask, base_multiplier: f32) -> f32 {
    let (h, w) = grid.dim();
    let mut sats = Vec::new();
    let mut vals = Vec::new();
    for row in 0..h {
        for col in 0..w {
            if mask[[row, col]] == 0 {
                continue;
            }
            let [r, g, b] = grid.pixel(row, col).map(|v| f32::from(v) / MAX_SAMPLE);
            let (_, s, v) = rgb_to_hsv_pixel(r, g, b);
            sats.push(s);
            vals.push(v);
        }
    }
    if sats.is_empty() {
        return base_multiplier;
    }

    let (mean_sat, std_sat) = mean_stddev(sats.iter().copied());
    let (mean_sat, std_sat) = (mean_sat as f32, std_sat as f32);
    let mean_val = mean_stddev(vals.iter().copied()).0 as f32;
    let median_sat = median(&mut sats);
    let p75_sat = percentile(&mut sats, 75.0);

    let sat_factor = if mean_sat < 0.15 {
        1.3
    } else if mean_sat < 0.25 {
        1.15
    } else if mean_sat > 0.4 {
        0.85
    } else {
        1.0
    };

    let variance_factor = if std_sat > 0.15 {
        1.1
    } else if std_sat < 0.08 {
        0.95
    } else {
        1.0
    };

    let brightness_factor = if mean_val < 0.3 {
        1.05
    } else if mean_val > 0.7 {
        0.98
    } else {
        1.0
    };

    let distribution_factor = if p75_sat > 0.5 {
        0.9
    } else if p75_sat < 0.2 {
        1.1
    } else {
        1.0
    };

    let multiplier = (base_multiplier
        * sat_factor
        * variance_factor
        * brightness_factor
        * distribution_factor)
        .clamp(ADAPTIVE_MIN, ADAPTIVE_MAX);

    debug!(
        mean_sat,
        median_sat,
        std_sat,
        mean_val,
        p75_sat,
        multiplier,
        "adaptive saturation"
    );
    multiplier
}

fn map_hsv<F>(grid: &PixelGrid, f: F) -> PixelGrid
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32) + Sync + Send,
{
    grid.map_pixels(|[r, g, b]| {
        let (h, s, v) = rgb_to_hsv_pixel(r / MAX_SAMPLE, g / MAX_SAMPLE, b / MAX_SAMPLE);
        let (h, s, v) = f(h, s, v);
        let (r, g, b) = hsv_to_rgb_pixel(h, s, v);
        [r * MAX_SAMPLE, g * MAX_SAMPLE, b * MAX_SAMPLE]
    })
}
