//! Reduction configuration

use serde::{Deserialize, Serialize};

use crate::error::{ReduceError, Result};
use crate::projection::{DEFAULT_SEED, EMBEDDING_DIMENSIONS};

/// Scale of reduced vectors. Direction carries the signal; every non-zero
/// reduction lands on a sphere of this radius.
pub const DEFAULT_SCALE: f64 = 5.0;

/// Widest embedding a config may request; larger matrices are refused.
pub const MAX_DIMENSIONS: usize = 1 << 20;

/// Fraction of the distance a walk-mode camera moves toward the path centroid per record.
pub const DEFAULT_FOCUS_LERP: f64 = 0.1;

/// Tunables for matrix generation and reduction.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Starting seed for matrix generation (default: 42)
    pub seed: u64,
    /// Expected embedding width, and the matrix column count (default: 3072)
    pub dimensions: usize,
    /// Output radius for the projection method (default: 5.0)
    pub projection_scale: f64,
    /// Output radius for the simple averaging method (default: 5.0)
    pub simple_scale: f64,
    /// Camera re-centering factor for walk mode (default: 0.1)
    pub focus_lerp: f64,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            dimensions: EMBEDDING_DIMENSIONS,
            projection_scale: DEFAULT_SCALE,
            simple_scale: DEFAULT_SCALE,
            focus_lerp: DEFAULT_FOCUS_LERP,
        }
    }
}

impl ReduceConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReduceError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set both method scales at once.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.projection_scale = scale;
        self.simple_scale = scale;
        self
    }

    /// True when the shared seed-42, 3072-wide matrix can serve this config.
    pub fn uses_shared_matrix(&self) -> bool {
        self.seed == DEFAULT_SEED && self.dimensions == EMBEDDING_DIMENSIONS
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 || self.dimensions > MAX_DIMENSIONS {
            return Err(ReduceError::InvalidConfig(format!(
                "dimensions must be within 1..={}, got {}",
                MAX_DIMENSIONS, self.dimensions
            )));
        }
        for (name, scale) in [
            ("projection_scale", self.projection_scale),
            ("simple_scale", self.simple_scale),
        ] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ReduceError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, scale
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.focus_lerp) {
            return Err(ReduceError::InvalidConfig(format!(
                "focus_lerp must be within [0, 1], got {}",
                self.focus_lerp
            )));
        }
        Ok(())
    }
}
