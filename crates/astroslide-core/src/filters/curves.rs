//! Tone curves on normalized lightness (0..1).

use ndarray::Array2;

use crate::consts::MAX_SAMPLE;
use crate::frame::quantize;

/// Lift shadows toward `l^power`, weighted by `(1 - l)^2` and scaled by `blend`.
#[inline]
pub fn shadow_lift(l: f32, power: f32, blend: f32) -> f32 {
    let lifted = l.max(0.0).powf(power);
    let weight = (1.0 - l) * (1.0 - l);
    l + (lifted - l) * weight * blend
}

/// Soft-knee highlight compression above `threshold`.
#[inline]
pub fn highlight_knee(l: f32, threshold: f32, strength: f32) -> f32 {
    let over = (l - threshold).max(0.0) / (1.0 - threshold);
    l - over * strength * (l - threshold)
}

/// Logistic S-curve centered at 0.5, mixed with the identity by `blend`.
pub fn s_curve_lut(steepness: f32, blend: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let x = i as f32 / MAX_SAMPLE;
        let s = 1.0 / (1.0 + (-steepness * (x - 0.5)).exp());
        *slot = quantize((x * (1.0 - blend) + s * blend) * MAX_SAMPLE);
    }
    lut
}

pub fn apply_lut(plane: &Array2<u8>, lut: &[u8; 256]) -> Array2<u8> {
    plane.mapv(|v| lut[v as usize])
}

/// Apply a normalized curve to an 8-bit lightness plane.
pub fn apply_curve<F>(plane: &Array2<u8>, curve: F) -> Array2<u8>
where
    F: Fn(f32) -> f32,
{
    plane.mapv(|v| quantize(curve(f32::from(v) / MAX_SAMPLE) * MAX_SAMPLE))
}
