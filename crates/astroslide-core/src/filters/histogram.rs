use ndarray::Axis;
use serde::Serialize;

use crate::color::grayscale;
use crate::color::process_channels;
use crate::consts::{EPSILON, MAX_SAMPLE};
use crate::frame::PixelGrid;
use crate::stats::{histogram_percentile, histogram_u8};

/// Four 256-bin count arrays over the full 0..=255 range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Histogram {
    #[serde(with = "bins")]
    pub red: [u64; 256],
    #[serde(with = "bins")]
    pub green: [u64; 256],
    #[serde(with = "bins")]
    pub blue: [u64; 256],
    #[serde(with = "bins")]
    pub luminance: [u64; 256],
}

mod bins {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bins: &[u64; 256], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bins.iter())
    }
}

impl Histogram {
    /// Total number of samples counted per channel.
    pub fn total(&self) -> u64 {
        self.red.iter().sum()
    }
}

/// Per-channel and luminance histograms of a grid.
pub fn histogram(grid: &PixelGrid) -> Histogram {
    let data = grid.data();
    let red = histogram_u8(data.index_axis(Axis(2), 0).iter());
    let green = histogram_u8(data.index_axis(Axis(2), 1).iter());
    let blue = histogram_u8(data.index_axis(Axis(2), 2).iter());

    let mut luminance = [0u64; 256];
    for &v in grayscale(grid).iter() {
        luminance[v as usize] += 1;
    }

    Histogram {
        red,
        green,
        blue,
        luminance,
    }
}

/// Linear stretch of each channel between its own `low`/`high` percentiles.
///
/// A channel whose two percentiles coincide is left unchanged.
pub fn percentile_stretch(grid: &PixelGrid, low: f32, high: f32) -> PixelGrid {
    process_channels(grid, |plane| {
        let mut hist = [0u64; 256];
        for &v in plane.iter() {
            hist[v as usize] += 1;
        }
        let p_low = histogram_percentile(&hist, low);
        let p_high = histogram_percentile(&hist, high);
        if p_high - p_low <= EPSILON {
            return plane.clone();
        }
        let scale = MAX_SAMPLE / (p_high - p_low);
        plane.mapv(|v| ((v - p_low) * scale).clamp(0.0, MAX_SAMPLE))
    })
}
