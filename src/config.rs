//! Generation configuration
//!
//! Everything that shapes a map is passed explicitly through [`GenerationConfig`];
//! nothing is read from the environment or from globals.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::forests::ForestParams;
use crate::heightmap::NoiseParams;
use crate::terrain::ClassificationThresholds;

/// Range used when a map is created without an explicit seed.
pub const RANDOM_SEED_RANGE: std::ops::RangeInclusive<u64> = 1..=250;

/// Parameters for one terrain generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map width in cells
    pub width: usize,
    /// Map height in cells
    pub height: usize,
    /// Cells per unit of noise space (higher = broader features)
    pub base_scale: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave, in (0, 1]
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
    /// Master seed
    pub seed: u64,
    /// Gaussian smoothing sigma in cells (0 disables smoothing)
    pub smooth_sigma: f64,
    /// Height bands for classification
    pub thresholds: ClassificationThresholds,
    /// Forest overlay settings
    pub forest: ForestParams,
    /// Rows at the top and bottom forced to tundra (0 = off)
    pub polar_tundra_rows: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            base_scale: 40.0,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 42,
            smooth_sigma: 3.0,
            thresholds: ClassificationThresholds::default(),
            forest: ForestParams::default(),
            polar_tundra_rows: 0,
        }
    }
}

impl GenerationConfig {
    /// Default config with explicit size and seed.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    /// Default config with a seed drawn from [`RANDOM_SEED_RANGE`].
    pub fn with_random_seed(width: usize, height: usize) -> Self {
        let seed = rand::thread_rng().gen_range(RANDOM_SEED_RANGE);
        Self::new(width, height, seed)
    }

    /// Check every parameter before any stage runs.
    pub fn validate(&self) -> Result<()> {
        NoiseParams::from(self).validate(self.width, self.height)?;
        if !(self.smooth_sigma.is_finite() && self.smooth_sigma >= 0.0) {
            return Err(TerrainError::invalid(format!(
                "smooth_sigma must be non-negative, got {}",
                self.smooth_sigma
            )));
        }
        self.thresholds.validate()?;
        self.forest.validate()?;
        Ok(())
    }
}
