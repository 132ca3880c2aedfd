use crate::color::luma;
use crate::consts::{EPSILON, MAX_SAMPLE};
use crate::frame::PixelGrid;

const MAX_GAIN: f32 = 5.0;

/// Hue-preserving asinh stretch.
///
/// After black-point subtraction the luminance `L` is mapped through
/// `asinh(k * L) / asinh(k)`, and every channel is multiplied by the same
/// gain (stretched / original luminance, at most 5x).
pub fn asinh_stretch(grid: &PixelGrid, stretch_factor: f32, black_point: f32) -> PixelGrid {
    let black_point = black_point.clamp(0.0, 1.0 - EPSILON);
    let range = 1.0 - black_point;
    let norm = if stretch_factor > EPSILON {
        stretch_factor.asinh()
    } else {
        0.0
    };

    grid.map_pixels(|px| {
        let [r, g, b] = px.map(|v| ((v / MAX_SAMPLE - black_point) / range).max(0.0));
        let lum = luma(r, g, b);
        let stretched = if norm > 0.0 {
            (stretch_factor * lum).asinh() / norm
        } else {
            lum
        };
        let gain = (stretched / (lum + EPSILON)).clamp(0.0, MAX_GAIN);
        [r, g, b].map(|v| (v * gain).min(1.0) * MAX_SAMPLE)
    })
}
