//! Terrain grid container and the generation entry point
//!
//! Runs noise -> normalize -> smooth -> classify -> forests and bundles the
//! results into an immutable [`TerrainGrid`].

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::error::{Result, TerrainError};
use crate::forests::{self, ForestPatch};
use crate::heightmap::{self, NoiseParams};
use crate::seeds::TerrainSeeds;
use crate::smoothing;
use crate::terrain::{self, TerrainCategory};
use crate::tilemap::Tilemap;

/// A generated map. Read-only once built; share it by reference or `Arc`.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    config: GenerationConfig,
    seeds: TerrainSeeds,
    /// Smoothed, normalized elevation that classification was run on
    elevation: Tilemap<f32>,
    /// Classification before the forest overlay
    base: Tilemap<TerrainCategory>,
    /// Final categories, forests included
    terrain: Tilemap<TerrainCategory>,
    patches: Vec<ForestPatch>,
}

/// Everything known about one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub elevation: f32,
    pub base: TerrainCategory,
    pub category: TerrainCategory,
}

/// Generate a terrain grid from `config`.
///
/// Deterministic for a given config: the same seed always yields the same grid.
pub fn generate_terrain(config: GenerationConfig) -> Result<TerrainGrid> {
    config.validate()?;
    let seeds = TerrainSeeds::from_master(config.seed);
    let (width, height) = (config.width, config.height);

    tracing::debug!(width, height, seed = config.seed, "generating height field");
    let raw = heightmap::generate_heightmap(width, height, &NoiseParams::from(&config), &seeds)?;

    let normalized = heightmap::normalize_heightmap(&raw);

    tracing::debug!(sigma = config.smooth_sigma, "smoothing height field");
    let elevation = smoothing::gaussian_blur(&normalized, config.smooth_sigma);

    let base = terrain::classify_terrain(&elevation, &config.thresholds, config.polar_tundra_rows);

    let mut rng = ChaCha8Rng::seed_from_u64(seeds.forests);
    let (terrain, patches) = forests::generate_forests(&base, &config.forest, &mut rng)?;

    let grid = TerrainGrid {
        config,
        seeds,
        elevation,
        base,
        terrain,
        patches,
    };
    tracing::info!(
        width,
        height,
        seed = grid.seed(),
        forest_patches = grid.patches.len(),
        "terrain generated"
    );
    Ok(grid)
}

impl TerrainGrid {
    /// Terrain category at (x, y), forests included.
    pub fn get(&self, x: usize, y: usize) -> Result<TerrainCategory> {
        self.terrain.try_get(x, y).copied().ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Category at (x, y) before forests were overlaid.
    pub fn base_category(&self, x: usize, y: usize) -> Result<TerrainCategory> {
        self.base.try_get(x, y).copied().ok_or_else(|| self.out_of_bounds(x, y))
    }

    /// Smoothed, normalized elevation at (x, y).
    pub fn elevation(&self, x: usize, y: usize) -> Result<f32> {
        self.elevation.try_get(x, y).copied().ok_or_else(|| self.out_of_bounds(x, y))
    }

    pub fn tile_info(&self, x: usize, y: usize) -> Result<TileInfo> {
        Ok(TileInfo {
            x,
            y,
            elevation: self.elevation(x, y)?,
            base: self.base_category(x, y)?,
            category: self.get(x, y)?,
        })
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.terrain.width, self.terrain.height)
    }

    pub fn width(&self) -> usize {
        self.terrain.width
    }

    pub fn height(&self) -> usize {
        self.terrain.height
    }

    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn seeds(&self) -> &TerrainSeeds {
        &self.seeds
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn forest_patches(&self) -> &[ForestPatch] {
        &self.patches
    }

    /// Final category map.
    pub fn categories(&self) -> &Tilemap<TerrainCategory> {
        &self.terrain
    }

    pub fn base_categories(&self) -> &Tilemap<TerrainCategory> {
        &self.base
    }

    pub fn elevation_map(&self) -> &Tilemap<f32> {
        &self.elevation
    }

    /// Iterate over (x, y, category) in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TerrainCategory)> + '_ {
        self.terrain.iter().map(|(x, y, &c)| (x, y, c))
    }

    /// Number of cells per category; categories with no cells are omitted.
    pub fn category_counts(&self) -> BTreeMap<TerrainCategory, usize> {
        let mut counts = BTreeMap::new();
        for (_, _, category) in self.cells() {
            *counts.entry(category).or_insert(0) += 1;
        }
        counts
    }

    /// Category codes, one row per `Vec`.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        (0..self.height())
            .map(|y| (0..self.width()).map(|x| self.terrain.get(x, y).code()).collect())
            .collect()
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> TerrainError {
        TerrainError::OutOfBounds {
            x,
            y,
            width: self.terrain.width,
            height: self.terrain.height,
        }
    }
}
