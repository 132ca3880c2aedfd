use std::f32::consts::PI;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::grayscale;
use crate::consts::{MAX_SAMPLE, SPIKE_BRIGHTNESS, SPIKE_COUNT, SPIKE_LENGTH, SPIKE_THRESHOLD_FACTOR};
use crate::detection::{binary_threshold, connected_components, mean_sigma_threshold};
use crate::filters::gaussian_blur_ksize;
use crate::frame::PixelGrid;

const MIN_STAR_AREA: usize = 2;
const LENGTH_PER_RADIUS: f32 = 8.0;
const WIDTH_PER_RADIUS: f32 = 0.25;
const FIRST_SPIKE_ANGLE_DEG: f32 = 45.0;
const SPIKE_BLUR_KERNEL: usize = 3;

/// Diffraction spike parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeParams {
    /// Relative spike length.
    pub length: f32,
    /// Peak spike intensity relative to the star's color.
    pub brightness: f32,
    /// Sigma multiplier for the star detection threshold.
    pub threshold_factor: f32,
    /// Rays per star, evenly spaced from 45°.
    pub num_spikes: usize,
}

impl Default for SpikeParams {
    fn default() -> Self {
        Self {
            length: SPIKE_LENGTH,
            brightness: SPIKE_BRIGHTNESS,
            threshold_factor: SPIKE_THRESHOLD_FACTOR,
            num_spikes: SPIKE_COUNT,
        }
    }
}

/// A star found by the spike pass.
#[derive(Clone, Debug)]
struct SpikeSource {
    row: f32,
    col: f32,
    length: f32,
    half_width: f32,
    color: [f32; 3],
}

/// Overlay synthetic diffraction spikes on bright stars.
///
/// Stars are connected components of grayscale above
/// `mean + threshold_factor * stddev` with at least two pixels. Each gets
/// `num_spikes` rays whose length grows with `sqrt(area)` and the star's
/// brightness above threshold; rays fade with a Gaussian along their length
/// and taper linearly in width. Spikes add without occlusion.
pub fn add_star_spikes(grid: &PixelGrid, params: &SpikeParams) -> PixelGrid {
    if params.num_spikes == 0 || params.length <= 0.0 || params.brightness <= 0.0 {
        return grid.clone();
    }

    let sources = find_sources(grid, params);
    debug!(stars = sources.len(), "diffraction spikes");
    if sources.is_empty() {
        return grid.clone();
    }

    let (h, w) = grid.dim();
    let mut layer = [
        Array2::<f32>::zeros((h, w)),
        Array2::<f32>::zeros((h, w)),
        Array2::<f32>::zeros((h, w)),
    ];

    let step = 2.0 * PI / params.num_spikes as f32;
    for source in &sources {
        for k in 0..params.num_spikes {
            let angle = FIRST_SPIKE_ANGLE_DEG.to_radians() + k as f32 * step;
            draw_ray(&mut layer, source, angle, params.brightness);
        }
    }

    let [r, g, b] = grid.channels();
    let [lr, lg, lb] = &layer;
    PixelGrid::from_channels(&[
        r + &gaussian_blur_ksize(lr, SPIKE_BLUR_KERNEL),
        g + &gaussian_blur_ksize(lg, SPIKE_BLUR_KERNEL),
        b + &gaussian_blur_ksize(lb, SPIKE_BLUR_KERNEL),
    ])
}

fn find_sources(grid: &PixelGrid, params: &SpikeParams) -> Vec<SpikeSource> {
    let gray = grayscale(grid);
    let threshold = mean_sigma_threshold(&gray, params.threshold_factor);
    let mask = binary_threshold(&gray, threshold);
    let (h, w) = grid.dim();
    let headroom = (MAX_SAMPLE - threshold).max(1.0);

    connected_components(&mask)
        .into_iter()
        .filter(|c| c.area >= MIN_STAR_AREA)
        .filter_map(|comp| {
            let size = (comp.area as f32).sqrt();
            let brightness = ((comp.peak(&gray) - threshold) / headroom).clamp(0.0, 1.0);
            let length = size * LENGTH_PER_RADIUS * params.length * (0.5 + brightness);
            if length < 1.0 {
                return None;
            }
            let (cy, cx) = comp.centroid;
            let row = (cy.round() as usize).min(h - 1);
            let col = (cx.round() as usize).min(w - 1);
            let color = grid.pixel(row, col).map(|v| f32::from(v) / MAX_SAMPLE);
            Some(SpikeSource {
                row: cy as f32,
                col: cx as f32,
                length,
                half_width: (size * WIDTH_PER_RADIUS).max(1.0),
                color,
            })
        })
        .collect()
}

/// Rasterize one ray into the additive layer.
fn draw_ray(layer: &mut [Array2<f32>; 3], source: &SpikeSource, angle: f32, brightness: f32) {
    let (h, w) = layer[0].dim();
    let (dir_y, dir_x) = angle.sin_cos();
    let end_y = source.row + dir_y * source.length;
    let end_x = source.col + dir_x * source.length;
    let pad = source.half_width + 1.0;

    let r0 = (source.row.min(end_y) - pad).floor().max(0.0) as usize;
    let r1 = ((source.row.max(end_y) + pad).ceil() as usize).min(h - 1);
    let c0 = (source.col.min(end_x) - pad).floor().max(0.0) as usize;
    let c1 = ((source.col.max(end_x) + pad).ceil() as usize).min(w - 1);

    let sigma = source.length / 3.0;
    let inv_two_sigma2 = 1.0 / (2.0 * sigma * sigma);

    for row in r0..=r1 {
        for col in c0..=c1 {
            let vy = row as f32 - source.row;
            let vx = col as f32 - source.col;
            let along = vy * dir_y + vx * dir_x;
            if along < 0.0 || along > source.length {
                continue;
            }
            let across = (vx * dir_y - vy * dir_x).abs();
            let half_width = source.half_width * (1.0 - along / source.length);
            let edge = (1.0 - across / (half_width + 0.5)).clamp(0.0, 1.0);
            if edge <= 0.0 {
                continue;
            }
            let falloff = (-along * along * inv_two_sigma2).exp();
            let intensity = brightness * falloff * edge * MAX_SAMPLE;
            for (plane, &tint) in layer.iter_mut().zip(source.color.iter()) {
                plane[[row, col]] += tint * intensity;
            }
        }
    }
}
