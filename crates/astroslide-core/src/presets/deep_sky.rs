use tracing::debug;

use crate::adjust::{boost_value, scale_saturation};
use crate::color::convert::{lightness_from_u8, lightness_to_u8};
use crate::color::{lab_to_rgb, rgb_to_lab};
use crate::consts::{STRETCH_HIGH_PERCENTILE, STRETCH_LOW_PERCENTILE};
use crate::denoise::astro_denoise;
use crate::filters::{clahe, percentile_stretch, unsharp_mask};
use crate::frame::PixelGrid;
use crate::stars::reduce_stars;

/// Final astro denoise parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenoiseStep {
    pub strength: f32,
    pub protect_stars: bool,
    pub edge_aware: bool,
}

/// Parameter set shared by the deep-sky family of presets.
///
/// Stages run in a fixed order: percentile stretch, optional lightness CLAHE,
/// saturation, unsharp mask, optional star reduction, optional value boost,
/// astro denoise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeepSkyRecipe {
    /// `(clip_limit, tiles)` for an unmasked CLAHE on L*.
    pub clahe: Option<(f32, (usize, usize))>,
    pub saturation: f32,
    /// `(sigma, weight, blur_weight)`.
    pub unsharp: (f32, f32, f32),
    pub star_reduction: Option<f32>,
    pub value_boost: Option<f32>,
    pub denoise: DenoiseStep,
}

impl DeepSkyRecipe {
    pub const DEEP_SKY: Self = Self {
        clahe: None,
        saturation: 1.4,
        unsharp: (2.0, 1.5, -0.5),
        star_reduction: Some(0.85),
        value_boost: Some(1.15),
        denoise: DenoiseStep {
            strength: 1.2,
            protect_stars: true,
            edge_aware: true,
        },
    };

    pub const NEBULA: Self = Self {
        saturation: 1.5,
        star_reduction: Some(0.9),
        ..Self::DEEP_SKY
    };

    pub const GALAXY: Self = Self {
        clahe: Some((1.5, (8, 8))),
        saturation: 1.35,
        unsharp: (2.0, 1.5, -0.5),
        star_reduction: Some(0.85),
        value_boost: Some(1.12),
        denoise: DenoiseStep {
            strength: 1.0,
            protect_stars: true,
            edge_aware: true,
        },
    };

    pub const STAR_CLUSTER: Self = Self {
        clahe: None,
        saturation: 1.5,
        unsharp: (1.5, 1.6, -0.6),
        star_reduction: None,
        value_boost: None,
        denoise: DenoiseStep {
            strength: 0.8,
            protect_stars: true,
            edge_aware: false,
        },
    };

    pub fn apply(&self, grid: &PixelGrid) -> PixelGrid {
        let mut result = percentile_stretch(grid, STRETCH_LOW_PERCENTILE, STRETCH_HIGH_PERCENTILE);

        if let Some((clip, tiles)) = self.clahe {
            let mut lab = rgb_to_lab(&result);
            let l = clahe(&lightness_to_u8(&lab.l), clip, tiles);
            lab.l = lightness_from_u8(&l);
            result = lab_to_rgb(&lab);
        }

        result = scale_saturation(&result, self.saturation);

        let (sigma, weight, blur_weight) = self.unsharp;
        result = unsharp_mask(&result, sigma, weight, blur_weight);

        if let Some(amount) = self.star_reduction {
            debug!(amount, "deep sky star reduction");
            result = reduce_stars(&result, None, amount, true);
        }

        if let Some(factor) = self.value_boost {
            result = boost_value(&result, factor);
        }

        let d = self.denoise;
        astro_denoise(&result, d.strength, d.protect_stars, d.edge_aware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nebula_differs_from_deep_sky_only_in_color_and_reduction() {
        let n = DeepSkyRecipe::NEBULA;
        let d = DeepSkyRecipe::DEEP_SKY;
        assert_eq!(n.saturation, 1.5);
        assert_eq!(n.star_reduction, Some(0.9));
        assert_eq!(n.unsharp, d.unsharp);
        assert_eq!(n.value_boost, d.value_boost);
        assert_eq!(n.denoise, d.denoise);
    }

    #[test]
    fn test_star_cluster_keeps_stars() {
        let grid = PixelGrid::from_shape_fn(24, 24, |(r, c, _)| {
            if (r, c) == (12, 12) {
                250
            } else {
                ((r * 5 + c * 3) % 20) as u8
            }
        });
        let out = DeepSkyRecipe::STAR_CLUSTER.apply(&grid);
        assert_eq!(out.dim(), grid.dim());
        assert!(out.pixel(12, 12)[0] > out.pixel(0, 0)[0]);
    }
}
