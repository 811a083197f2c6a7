// config.rs - Stereogram options
//
// Loaded from JSON (missing fields take defaults) and validated once,
// before the pattern tile is drawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StereoError};

pub const DEFAULT_TILE_DENSITY: usize = 5;
pub const DEFAULT_QUANT_LEVELS: usize = 3;
pub const DEFAULT_FOCAL_LENGTH: f32 = 0.2;

/// Options controlling pattern generation and synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoConfig {
    /// Fraction of the depth map each pattern tile side covers (f).
    pub tile_density: usize,
    /// Number of discrete random levels in the pattern (n).
    pub quant_levels: usize,
    /// Scales the maximum horizontal disparity; expected in (0, 1].
    pub focal_length: f32,
    /// Mirror the first half-tile of depth columns onto the left edge.
    pub center: bool,
    /// Pattern RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            tile_density: DEFAULT_TILE_DENSITY,
            quant_levels: DEFAULT_QUANT_LEVELS,
            focal_length: DEFAULT_FOCAL_LENGTH,
            center: true,
            seed: None,
        }
    }
}

impl StereoConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_density == 0 {
            return Err(StereoError::InvalidTileDensity);
        }
        if self.quant_levels == 0 {
            return Err(StereoError::InvalidQuantLevels);
        }
        if !self.focal_length.is_finite() {
            return Err(StereoError::InvalidFocalLength(self.focal_length));
        }
        if self.focal_length <= 0.0 {
            log::warn!(
                "focal length {} <= 0: output will carry no depth",
                self.focal_length
            );
        } else if self.focal_length > 1.0 {
            log::warn!(
                "focal length {} > 1: near regions may shift past the pattern width",
                self.focal_length
            );
        } else if self.focal_length == 1.0 {
            log::warn!("focal length 1: nearest samples are clamped to a one-column lookback");
        }
        Ok(())
    }

    /// Focal length as used by the fill. Non-positive values collapse to 0.
    pub fn effective_focal_length(&self) -> f32 {
        self.focal_length.max(0.0)
    }
}
