//! The closed set of enhancement presets and their static registry.

mod deep_sky;
mod general;
mod moon;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AstroError;
use crate::frame::PixelGrid;

pub use deep_sky::{DeepSkyRecipe, DenoiseStep};

/// One of the seven preset pipelines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    MineralMoonSubtle,
    DeepSky,
    #[default]
    General,
    MoonHdr,
    Nebula,
    Galaxy,
    StarCluster,
}

/// Static metadata for a preset.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PresetDescriptor {
    #[serde(skip)]
    pub kind: PresetKind,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub best_for: &'static str,
}

/// Registry in presentation order. Built at compile time, never mutated.
pub static PRESETS: [PresetDescriptor; 7] = [
    PresetDescriptor {
        kind: PresetKind::MineralMoonSubtle,
        id: "mineral_moon_subtle",
        name: "Mineral Moon (Subtle)",
        description: "Conservative enhancement for scientific accuracy",
        best_for: "Scientific/realistic lunar imaging",
    },
    PresetDescriptor {
        kind: PresetKind::DeepSky,
        id: "deep_sky",
        name: "Deep Sky Boost",
        description: "Optimized for nebulae, galaxies, and star clusters",
        best_for: "Deep space objects",
    },
    PresetDescriptor {
        kind: PresetKind::General,
        id: "general",
        name: "General Auto",
        description: "Balanced enhancement for any astrophoto",
        best_for: "General astrophotography",
    },
    PresetDescriptor {
        kind: PresetKind::MoonHdr,
        id: "moon_hdr",
        name: "Moon HDR",
        description: "HDR tone mapping for lunar surface detail",
        best_for: "Seestar and smart telescope moon captures",
    },
    PresetDescriptor {
        kind: PresetKind::Nebula,
        id: "nebula",
        name: "Nebula",
        description: "Strong color and star reduction to bring out gas clouds",
        best_for: "Emission and reflection nebulae",
    },
    PresetDescriptor {
        kind: PresetKind::Galaxy,
        id: "galaxy",
        name: "Galaxy",
        description: "Local contrast for spiral arms and dust lanes with gentle star reduction",
        best_for: "Spiral and elliptical galaxies",
    },
    PresetDescriptor {
        kind: PresetKind::StarCluster,
        id: "star_cluster",
        name: "Star Cluster",
        description: "Crisp, colorful stars with no star reduction",
        best_for: "Open and globular clusters",
    },
];

/// Every preset descriptor, in registry order.
pub fn registry() -> &'static [PresetDescriptor] {
    &PRESETS
}

/// All valid preset identifiers, in registry order.
pub fn preset_ids() -> Vec<String> {
    PRESETS.iter().map(|p| p.id.to_string()).collect()
}

impl PresetKind {
    pub const ALL: [PresetKind; 7] = [
        Self::MineralMoonSubtle,
        Self::DeepSky,
        Self::General,
        Self::MoonHdr,
        Self::Nebula,
        Self::Galaxy,
        Self::StarCluster,
    ];

    pub fn descriptor(self) -> &'static PresetDescriptor {
        let index = match self {
            Self::MineralMoonSubtle => 0,
            Self::DeepSky => 1,
            Self::General => 2,
            Self::MoonHdr => 3,
            Self::Nebula => 4,
            Self::Galaxy => 5,
            Self::StarCluster => 6,
        };
        &PRESETS[index]
    }

    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Run the full-strength pipeline on `grid`.
    pub fn run(self, grid: &PixelGrid) -> PixelGrid {
        match self {
            Self::MineralMoonSubtle => moon::mineral_moon_subtle(grid),
            Self::MoonHdr => moon::moon_hdr(grid),
            Self::General => general::general(grid),
            Self::DeepSky => DeepSkyRecipe::DEEP_SKY.apply(grid),
            Self::Nebula => DeepSkyRecipe::NEBULA.apply(grid),
            Self::Galaxy => DeepSkyRecipe::GALAXY.apply(grid),
            Self::StarCluster => DeepSkyRecipe::STAR_CLUSTER.apply(grid),
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PresetKind {
    type Err = AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRESETS
            .iter()
            .find(|p| p.id == s)
            .map(|p| p.kind)
            .ok_or_else(|| AstroError::UnknownPreset {
                id: s.to_string(),
                available: preset_ids(),
            })
    }
}
