//! Conversions between the canonical RGB grid and the working color spaces.
//!
//! Every forward conversion has an inverse here. Working planes never leave
//! the primitive that created them: callers convert in, transform, and convert
//! back to a [`PixelGrid`] before returning.

use ndarray::{Array2, Zip};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, MAX_SAMPLE};
use crate::frame::{quantize, PixelGrid};

/// D65 reference white.
const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.00000;
const D65_Z: f32 = 1.08883;

/// Linear sRGB → XYZ (D65).
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// XYZ (D65) → linear sRGB.
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.969_266, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

/// BT.601 luma of an RGB triple (any consistent unit).
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Unrounded BT.601 luminance plane in 0..255 units.
pub fn luminance(grid: &PixelGrid) -> Array2<f32> {
    let data = grid.data();
    let (h, w) = grid.dim();
    Array2::from_shape_fn((h, w), |(row, col)| {
        luma(
            f32::from(data[[row, col, 0]]),
            f32::from(data[[row, col, 1]]),
            f32::from(data[[row, col, 2]]),
        )
    })
}

/// 8-bit grayscale (rounded BT.601 luma), as f32 for downstream arithmetic.
pub fn grayscale(grid: &PixelGrid) -> Array2<f32> {
    luminance(grid).mapv(|v| f32::from(quantize(v)))
}

// ---------------------------------------------------------------------------
// HSV
// ---------------------------------------------------------------------------

/// HSV planes: hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Clone, Debug)]
pub struct HsvPlanes {
    pub h: Array2<f32>,
    pub s: Array2<f32>,
    pub v: Array2<f32>,
}

/// RGB (each 0..1) → (hue degrees, saturation, value).
#[inline]
pub fn rgb_to_hsv_pixel(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= 0.0 {
        return (0.0, s, v);
    }

    let h = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        60.0 * (b - r) / delta + 120.0
    } else {
        60.0 * (r - g) / delta + 240.0
    };
    let h = if h < 0.0 { h + 360.0 } else { h };
    (h, s, v)
}

/// (hue degrees, saturation, value) → RGB (each 0..1).
#[inline]
pub fn hsv_to_rgb_pixel(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    if s <= 0.0 {
        return (v, v, v);
    }

    let h = h.rem_euclid(360.0) / 60.0;
    let sector = (h.floor() as i32).rem_euclid(6);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

pub fn rgb_to_hsv(grid: &PixelGrid) -> HsvPlanes {
    let [r, g, b] = grid.channels();
    let (rows, cols) = grid.dim();
    let mut h = Array2::<f32>::zeros((rows, cols));
    let mut s = Array2::<f32>::zeros((rows, cols));
    let mut v = Array2::<f32>::zeros((rows, cols));

    Zip::from(&mut h)
        .and(&mut s)
        .and(&mut v)
        .and(&r)
        .and(&g)
        .and(&b)
        .for_each(|h, s, v, &r, &g, &b| {
            let (hh, ss, vv) = rgb_to_hsv_pixel(r / MAX_SAMPLE, g / MAX_SAMPLE, b / MAX_SAMPLE);
            *h = hh;
            *s = ss;
            *v = vv;
        });

    HsvPlanes { h, s, v }
}

pub fn hsv_to_rgb(hsv: &HsvPlanes) -> PixelGrid {
    let (rows, cols) = hsv.h.dim();
    let mut r = Array2::<f32>::zeros((rows, cols));
    let mut g = Array2::<f32>::zeros((rows, cols));
    let mut b = Array2::<f32>::zeros((rows, cols));

    Zip::from(&mut r)
        .and(&mut g)
        .and(&mut b)
        .and(&hsv.h)
        .and(&hsv.s)
        .and(&hsv.v)
        .for_each(|r, g, b, &h, &s, &v| {
            let (rr, gg, bb) = hsv_to_rgb_pixel(h, s, v);
            *r = rr * MAX_SAMPLE;
            *g = gg * MAX_SAMPLE;
            *b = bb * MAX_SAMPLE;
        });

    PixelGrid::from_channels(&[r, g, b])
}

// ---------------------------------------------------------------------------
// CIE L*a*b*
// ---------------------------------------------------------------------------

/// CIE L*a*b* planes: L in [0, 100], a/b roughly [-128, 127].
#[derive(Clone, Debug)]
pub struct LabPlanes {
    pub l: Array2<f32>,
    pub a: Array2<f32>,
    pub b: Array2<f32>,
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    let c = c.max(0.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / LAB_KAPPA
    }
}

/// sRGB (each 0..1) → (L, a, b).
#[inline]
pub fn rgb_to_lab_pixel(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let m = &SRGB_TO_XYZ;
    let x = (m[0][0] * r + m[0][1] * g + m[0][2] * b) / D65_X;
    let y = (m[1][0] * r + m[1][1] * g + m[1][2] * b) / D65_Y;
    let z = (m[2][0] * r + m[2][1] * g + m[2][2] * b) / D65_Z;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// (L, a, b) → sRGB (each 0..1, unclipped).
#[inline]
pub fn lab_to_rgb_pixel(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = lab_f_inv(fx) * D65_X;
    let y = lab_f_inv(fy) * D65_Y;
    let z = lab_f_inv(fz) * D65_Z;

    let m = &XYZ_TO_SRGB;
    let r = m[0][0] * x + m[0][1] * y + m[0][2] * z;
    let g = m[1][0] * x + m[1][1] * y + m[1][2] * z;
    let bb = m[2][0] * x + m[2][1] * y + m[2][2] * z;
    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(bb))
}

pub fn rgb_to_lab(grid: &PixelGrid) -> LabPlanes {
    let [r, g, b] = grid.channels();
    let (rows, cols) = grid.dim();
    let mut l = Array2::<f32>::zeros((rows, cols));
    let mut a = Array2::<f32>::zeros((rows, cols));
    let mut bb = Array2::<f32>::zeros((rows, cols));

    Zip::from(&mut l)
        .and(&mut a)
        .and(&mut bb)
        .and(&r)
        .and(&g)
        .and(&b)
        .for_each(|l, a, bb, &r, &g, &b| {
            let (ll, aa, bv) = rgb_to_lab_pixel(r / MAX_SAMPLE, g / MAX_SAMPLE, b / MAX_SAMPLE);
            *l = ll;
            *a = aa;
            *bb = bv;
        });

    LabPlanes { l, a, b: bb }
}

pub fn lab_to_rgb(lab: &LabPlanes) -> PixelGrid {
    let (rows, cols) = lab.l.dim();
    let mut r = Array2::<f32>::zeros((rows, cols));
    let mut g = Array2::<f32>::zeros((rows, cols));
    let mut b = Array2::<f32>::zeros((rows, cols));

    Zip::from(&mut r)
        .and(&mut g)
        .and(&mut b)
        .and(&lab.l)
        .and(&lab.a)
        .and(&lab.b)
        .for_each(|r, g, b, &l, &a, &bv| {
            let (rr, gg, bb) = lab_to_rgb_pixel(l, a, bv);
            *r = rr * MAX_SAMPLE;
            *g = gg * MAX_SAMPLE;
            *b = bb * MAX_SAMPLE;
        });

    PixelGrid::from_channels(&[r, g, b])
}

/// Quantize L (0..100) into the 8-bit lightness scale (0..255).
pub fn lightness_to_u8(l: &Array2<f32>) -> Array2<u8> {
    l.mapv(|v| quantize(v * MAX_SAMPLE / 100.0))
}

/// Expand 8-bit lightness (0..255) back to L (0..100).
pub fn lightness_from_u8(l: &Array2<u8>) -> Array2<f32> {
    l.mapv(|v| f32::from(v) * 100.0 / MAX_SAMPLE)
}

// ---------------------------------------------------------------------------
// YCbCr (full range, JPEG convention)
// ---------------------------------------------------------------------------

/// Luma/chroma planes in 0..255 units, chroma centered at 128.
#[derive(Clone, Debug)]
pub struct YCbCrPlanes {
    pub y: Array2<f32>,
    pub cb: Array2<f32>,
    pub cr: Array2<f32>,
}

pub fn rgb_to_ycbcr(grid: &PixelGrid) -> YCbCrPlanes {
    let [r, g, b] = grid.channels();
    let y = Zip::from(&r)
        .and(&g)
        .and(&b)
        .map_collect(|&r, &g, &b| luma(r, g, b));
    let cb = Zip::from(&r)
        .and(&g)
        .and(&b)
        .map_collect(|&r, &g, &b| 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b);
    let cr = Zip::from(&r)
        .and(&g)
        .and(&b)
        .map_collect(|&r, &g, &b| 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b);
    YCbCrPlanes { y, cb, cr }
}

pub fn ycbcr_to_rgb(planes: &YCbCrPlanes) -> PixelGrid {
    let r = Zip::from(&planes.y)
        .and(&planes.cr)
        .map_collect(|&y, &cr| y + 1.402 * (cr - 128.0));
    let g = Zip::from(&planes.y)
        .and(&planes.cb)
        .and(&planes.cr)
        .map_collect(|&y, &cb, &cr| y - 0.344136 * (cb - 128.0) - 0.714136 * (cr - 128.0));
    let b = Zip::from(&planes.y)
        .and(&planes.cb)
        .map_collect(|&y, &cb| y + 1.772 * (cb - 128.0));
    PixelGrid::from_channels(&[r, g, b])
}
