//! Streamer configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Configuration for a [`TerrainStreamer`](super::TerrainStreamer).
///
/// Positions are measured in world units; `segments` sample positions fit
/// in one world unit, and chunks are `units` sample positions wide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Seed string for the noise field
    pub seed: String,
    /// Samples per world unit
    pub segments: u32,
    /// Noise frequency multiplier
    pub scale: f64,
    /// Half-width of the window around the focus, in world units
    pub radius: f64,
    /// Chunk side length in samples
    pub units: u32,
    /// Build chunk bodies on the rayon pool during refresh
    pub parallel: bool,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            seed: "terrain".to_string(),
            segments: 32,
            scale: 0.2,
            radius: 15.0,
            units: 128,
            parallel: false,
        }
    }
}

impl StreamerConfig {
    /// Default configuration with the given seed
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Default::default()
        }
    }

    /// Check that the values describe a usable streamer
    pub fn validate(&self) -> Result<()> {
        if self.units == 0 {
            return Err(Error::Config("units must be positive".into()));
        }
        if i32::try_from(self.units).is_err() {
            return Err(Error::Config(format!(
                "units must be at most {}, got {}",
                i32::MAX,
                self.units
            )));
        }
        if self.segments == 0 {
            return Err(Error::Config("segments must be positive".into()));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::Config(format!(
                "radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        if !self.scale.is_finite() {
            return Err(Error::Config(format!("scale must be finite, got {}", self.scale)));
        }
        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Edge length of one sample in world units
    pub fn sample_size(&self) -> f32 {
        1.0 / self.segments as f32
    }
}
