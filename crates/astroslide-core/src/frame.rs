use ndarray::{Array2, Array3, Axis, Zip};

use crate::consts::{COLOR_CHANNEL_COUNT, MAX_SAMPLE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{AstroError, Result};

/// Binary region mask: every element is 0 or 255.
pub type Mask = Array2<u8>;

/// Soft region mask: every element is a coverage weight in [0.0, 1.0].
pub type SoftMask = Array2<f32>;

/// A decoded 8-bit RGB image.
///
/// Samples are stored row-major with shape `(height, width, 3)` in R, G, B
/// order. Dimensions are fixed at construction; every transform produces a
/// new grid of the same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    data: Array3<u8>,
}

impl PixelGrid {
    /// Build a grid from interleaved RGB bytes.
    pub fn from_raw(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width * height * COLOR_CHANNEL_COUNT;
        if width == 0 || height == 0 {
            return Err(AstroError::InvalidDimensions { width, height });
        }
        if samples.len() != expected {
            return Err(AstroError::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, COLOR_CHANNEL_COUNT), samples)
            .map_err(|e| AstroError::Processing(e.to_string()))?;
        Ok(Self { data })
    }

    /// Wrap an existing `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if h == 0 || w == 0 {
            return Err(AstroError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        if c != COLOR_CHANNEL_COUNT {
            return Err(AstroError::Processing(format!(
                "expected {COLOR_CHANNEL_COUNT} channels, got {c}"
            )));
        }
        Ok(Self { data })
    }

    /// A grid where every pixel has the same color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AstroError::InvalidDimensions { width, height });
        }
        let data = Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), |(_, _, c)| rgb[c]);
        Ok(Self { data })
    }

    /// Replicate a single grayscale plane into all three channels.
    pub fn from_gray(gray: &Array2<u8>) -> Result<Self> {
        let (h, w) = gray.dim();
        if h == 0 || w == 0 {
            return Err(AstroError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        let data =
            Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, _)| gray[[row, col]]);
        Ok(Self { data })
    }

    /// Build a grid sample-by-sample; `f` receives `(row, col, channel)`.
    pub(crate) fn from_shape_fn<F>(height: usize, width: usize, f: F) -> Self
    where
        F: FnMut((usize, usize, usize)) -> u8,
    {
        let data = Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), f);
        Self { data }
    }

    /// Wrap an array already known to be `(height, width, 3)`.
    pub(crate) fn from_data(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, COLOR_CHANNEL_COUNT);
        Self { data }
    }

    /// Quantize three float planes (0..255 scale) into a grid.
    ///
    /// Values are rounded and clipped to [0, 255]; NaN maps to 0.
    /// All planes must share the shape of `planes[0]`.
    pub fn from_channels(planes: &[Array2<f32>; 3]) -> Self {
        let (h, w) = planes[0].dim();
        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, c)| {
            quantize(planes[c][[row, col]])
        });
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        let (h, w, _) = self.data.dim();
        (h, w)
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }

    /// Interleaved RGB bytes, row-major.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    /// Copy one channel out as a float plane in 0..255 units.
    pub fn channel(&self, c: usize) -> Array2<f32> {
        self.data.index_axis(Axis(2), c).mapv(f32::from)
    }

    /// All three channels as float planes (R, G, B).
    pub fn channels(&self) -> [Array2<f32>; 3] {
        [self.channel(0), self.channel(1), self.channel(2)]
    }

    /// Apply a per-pixel float transform.
    ///
    /// `f` receives and returns `[r, g, b]` in 0..255 units; the result is
    /// rounded and clipped back into the 8-bit domain.
    pub fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn([f32; 3]) -> [f32; 3] + Sync + Send,
    {
        let (h, w) = self.dim();
        let mut out = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));

        let apply = |mut dst: ndarray::ArrayViewMut2<u8>, src: ndarray::ArrayView2<u8>| {
            for col in 0..src.nrows() {
                let px = [
                    f32::from(src[[col, 0]]),
                    f32::from(src[[col, 1]]),
                    f32::from(src[[col, 2]]),
                ];
                let mapped = f(px);
                for c in 0..COLOR_CHANNEL_COUNT {
                    dst[[col, c]] = quantize(mapped[c]);
                }
            }
        };

        let zip = Zip::from(out.axis_iter_mut(Axis(0))).and(self.data.axis_iter(Axis(0)));
        if h * w >= PARALLEL_PIXEL_THRESHOLD {
            zip.par_for_each(apply);
        } else {
            zip.for_each(apply);
        }

        Self { data: out }
    }
}

/// Round and clip a float sample into the 8-bit domain.
#[inline]
pub fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, MAX_SAMPLE) as u8
    }
}

/// Threshold a float plane into a binary mask: `value > threshold` → 255.
pub fn threshold_mask(plane: &Array2<f32>, threshold: f32) -> Mask {
    plane.mapv(|v| if v > threshold { 255 } else { 0 })
}

/// Convert a binary mask to coverage weights in [0, 1].
pub fn soft_mask(mask: &Mask) -> SoftMask {
    mask.mapv(|v| f32::from(v) / MAX_SAMPLE)
}

/// Number of set (non-zero) elements in a mask.
pub fn mask_count(mask: &Mask) -> usize {
    mask.iter().filter(|&&v| v > 0).count()
}
