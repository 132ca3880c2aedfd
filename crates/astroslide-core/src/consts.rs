/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-6;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a pixel grid (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Maximum 8-bit sample value as f32.
pub const MAX_SAMPLE: f32 = 255.0;

/// Laplacian variance divisor mapping typical astro noise onto [0, 1].
pub const NOISE_NORMALIZATION: f64 = 1000.0;

/// Intensity used when a request does not specify one.
pub const DEFAULT_INTENSITY: f32 = 0.75;

/// Longest side (pixels) of a preview render.
pub const PREVIEW_MAX_DIMENSION: usize = 200;

/// Fixed size of the enhancement worker pool.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default strength of the standalone star reduction operation.
pub const DEFAULT_STAR_REDUCTION: f32 = 0.5;

/// Percentile bounds for the per-channel stretch used by most presets.
pub const STRETCH_LOW_PERCENTILE: f32 = 0.1;
pub const STRETCH_HIGH_PERCENTILE: f32 = 99.9;

/// Post-blend star spike overlay: ray length scale.
pub const SPIKE_LENGTH: f32 = 0.5;

/// Post-blend star spike overlay: ray brightness.
pub const SPIKE_BRIGHTNESS: f32 = 0.6;

/// Post-blend star spike overlay: sigma multiplier for the star threshold.
pub const SPIKE_THRESHOLD_FACTOR: f32 = 2.0;

/// Post-blend star spike overlay: rays per star (4 = classic X).
pub const SPIKE_COUNT: usize = 4;

/// Median kernel used to synthesize the star-free background.
pub const STAR_BACKGROUND_MEDIAN_KERNEL: usize = 15;

/// Gaussian kernel size used to feather star masks before blending.
pub const STAR_MASK_FEATHER_KERNEL: usize = 7;

/// Block size of the local adaptive threshold used for aggressive star detection.
pub const ADAPTIVE_THRESHOLD_BLOCK: usize = 31;

/// Number of à trous layers used by the wavelet denoiser.
pub const WAVELET_DENOISE_LAYERS: usize = 4;

/// MAD-to-sigma conversion factor for Gaussian noise.
pub const MAD_TO_SIGMA: f32 = 0.6745;

/// Standard deviation of unit Gaussian noise in each B3 à trous detail layer.
pub const B3_NOISE_SCALE: [f32; 6] = [0.889, 0.200, 0.086, 0.041, 0.020, 0.010];

/// Largest encoded input accepted by `decode_bytes` (50 MiB).
pub const MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// JPEG output quality.
pub const JPEG_QUALITY: u8 = 98;
