use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, EPSILON};
use crate::error::AstroError;
use crate::frame::PixelGrid;
use crate::stats::{histogram_percentile, histogram_u8, mean_stddev};

const WHITE_PATCH_PERCENTILE: f32 = 99.5;

/// How [`auto_white_balance`] picks per-channel gains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteBalanceMethod {
    /// Equalize channel means.
    #[default]
    GrayWorld,
    /// Equalize the 99.5th percentile of each channel.
    WhitePatch,
}

impl fmt::Display for WhiteBalanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrayWorld => write!(f, "gray_world"),
            Self::WhitePatch => write!(f, "white_patch"),
        }
    }
}

impl FromStr for WhiteBalanceMethod {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gray_world" => Ok(Self::GrayWorld),
            "white_patch" => Ok(Self::WhitePatch),
            other => Err(AstroError::Processing(format!(
                "unknown white balance method '{other}' (expected gray_world or white_patch)"
            ))),
        }
    }
}

/// Scale each channel so the chosen statistic matches across channels.
pub fn auto_white_balance(grid: &PixelGrid, method: WhiteBalanceMethod) -> PixelGrid {
    let data = grid.data();
    let channel = |c: usize| data.index_axis(ndarray::Axis(2), c);

    let gains: [f32; COLOR_CHANNEL_COUNT] = match method {
        WhiteBalanceMethod::GrayWorld => {
            let means: Vec<f32> = (0..COLOR_CHANNEL_COUNT)
                .map(|c| mean_stddev(channel(c).iter().copied()).0 as f32)
                .collect();
            let target = means.iter().sum::<f32>() / COLOR_CHANNEL_COUNT as f32;
            [
                target / (means[0] + EPSILON),
                target / (means[1] + EPSILON),
                target / (means[2] + EPSILON),
            ]
        }
        WhiteBalanceMethod::WhitePatch => {
            let peaks: Vec<f32> = (0..COLOR_CHANNEL_COUNT)
                .map(|c| histogram_percentile(&histogram_u8(channel(c).iter()), WHITE_PATCH_PERCENTILE))
                .collect();
            let target = peaks.iter().copied().fold(0.0f32, f32::max);
            [
                target / (peaks[0] + EPSILON),
                target / (peaks[1] + EPSILON),
                target / (peaks[2] + EPSILON),
            ]
        }
    };
    debug!(%method, ?gains, "white balance");

    grid.map_pixels(|[r, g, b]| [r * gains[0], g * gains[1], b * gains[2]])
}
