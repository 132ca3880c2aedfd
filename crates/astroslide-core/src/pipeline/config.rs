use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_INTENSITY;
use crate::error::{AstroError, Result};
use crate::presets::PresetKind;

/// A validated enhancement request: a known preset and an intensity in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnhanceRequest {
    pub preset: PresetKind,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub star_spikes: bool,
}

fn default_intensity() -> f32 {
    DEFAULT_INTENSITY
}

impl Default for EnhanceRequest {
    fn default() -> Self {
        Self {
            preset: PresetKind::default(),
            intensity: DEFAULT_INTENSITY,
            star_spikes: false,
        }
    }
}

impl EnhanceRequest {
    /// Resolve `preset_id` against the registry and clamp `intensity`.
    ///
    /// Fails with [`AstroError::UnknownPreset`] before any pixel work. A
    /// missing or NaN intensity becomes the default 0.75.
    pub fn parse(preset_id: &str, intensity: Option<f32>, star_spikes: bool) -> Result<Self> {
        let preset = preset_id.parse::<PresetKind>()?;
        Ok(Self::new(preset, intensity.unwrap_or(DEFAULT_INTENSITY), star_spikes))
    }

    pub fn new(preset: PresetKind, intensity: f32, star_spikes: bool) -> Self {
        Self {
            preset,
            intensity: clamp_intensity(intensity),
            star_spikes,
        }
    }
}

/// Clamp into [0, 1]; NaN becomes the default intensity.
pub fn clamp_intensity(intensity: f32) -> f32 {
    if intensity.is_nan() {
        DEFAULT_INTENSITY
    } else {
        intensity.clamp(0.0, 1.0)
    }
}

/// File-level enhancement job, loadable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnhanceConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub preset: PresetKind,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub star_spikes: bool,
    /// Output encoding; guessed from the output extension when absent.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.png"),
            output: PathBuf::from("enhanced.jpg"),
            preset: PresetKind::default(),
            intensity: DEFAULT_INTENSITY,
            star_spikes: false,
            format: None,
        }
    }
}

impl EnhanceConfig {
    pub fn request(&self) -> EnhanceRequest {
        EnhanceRequest::new(self.preset, self.intensity, self.star_spikes)
    }

    /// Explicit `format`, else the encoding named by the output extension.
    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => OutputFormat::from_path(&self.output),
        }
    }
}

/// Encodings supported for enhanced output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Quality 98, no chroma subsampling.
    #[default]
    Jpeg,
    Png,
    /// LZW compressed.
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Jpeg, Self::Png, Self::Tiff];

    pub fn id(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Tiff => "TIFF",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Jpeg => "Compressed format, smaller file size",
            Self::Png => "Lossless format, preserves quality",
            Self::Tiff => "Professional format, maximum quality",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
        }
    }

    /// Encoding named by a file extension; unknown or missing extensions are rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.parse(),
            None => Err(AstroError::UnsupportedFormat(format!(
                "no extension on {}",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OutputFormat {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "tiff" | "tif" => Ok(Self::Tiff),
            other => Err(AstroError::UnsupportedFormat(other.to_string())),
        }
    }
}
