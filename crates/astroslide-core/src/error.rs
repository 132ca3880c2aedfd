use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstroError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel buffer size mismatch: expected {expected} samples, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Input too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Unknown preset '{id}'. Available presets: {}", available.join(", "))]
    UnknownPreset { id: String, available: Vec<String> },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TIFF encoding error: {0}")]
    Tiff(String),
}

impl From<tiff::TiffError> for AstroError {
    fn from(err: tiff::TiffError) -> Self {
        Self::Tiff(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AstroError>;
