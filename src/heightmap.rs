//! Height field generation and normalization
//!
//! Produces the raw fBm field that every later stage works on, then rescales it
//! to the 0.0-1.0 range the classifier expects.

use std::f64::consts::TAU;

use noise::{NoiseFn, Perlin, Seedable};

use crate::config::GenerationConfig;
use crate::error::{Result, TerrainError};
use crate::seeds::TerrainSeeds;
use crate::tilemap::Tilemap;

/// Largest coordinate magnitude handed to Perlin. The lattice is indexed with
/// `isize`, so sample points have to stay far below its range.
pub const MAX_SAMPLE_COORDINATE: f64 = 1.0e12;

// =============================================================================
// NOISE PARAMETERS
// =============================================================================

/// Octave settings for the fBm height field.
#[derive(Clone, Copy, Debug)]
pub struct NoiseParams {
    /// Cells per unit of noise space
    pub base_scale: f64,
    /// Number of noise octaves
    pub octaves: u32,
    /// Amplitude decay per octave
    pub persistence: f64,
    /// Frequency multiplier per octave
    pub lacunarity: f64,
}

impl From<&GenerationConfig> for NoiseParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            base_scale: config.base_scale,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
        }
    }
}

impl NoiseParams {
    /// Check the octave settings for a `width` x `height` field.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(TerrainError::invalid(format!(
                "map dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !(self.base_scale.is_finite() && self.base_scale > 0.0) {
            return Err(TerrainError::invalid(format!(
                "base_scale must be positive, got {}",
                self.base_scale
            )));
        }
        if self.octaves < 1 {
            return Err(TerrainError::invalid("octaves must be at least 1"));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(TerrainError::invalid(format!(
                "persistence must be in (0, 1], got {}",
                self.persistence
            )));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(TerrainError::invalid(format!(
                "lacunarity must be positive, got {}",
                self.lacunarity
            )));
        }
        let reach = self.max_sample_coordinate(width, height);
        if !(reach.is_finite() && reach <= MAX_SAMPLE_COORDINATE) {
            return Err(TerrainError::invalid(format!(
                "{} octaves at lacunarity {} with base_scale {} sample noise at {:e}, limit is {:e}",
                self.octaves, self.lacunarity, self.base_scale, reach, MAX_SAMPLE_COORDINATE
            )));
        }
        Ok(())
    }

    /// Largest coordinate any octave samples: the bigger torus radius times
    /// the highest octave frequency.
    pub fn max_sample_coordinate(&self, width: usize, height: usize) -> f64 {
        let radius = width.max(height) as f64 / (TAU * self.base_scale);
        let top_frequency = self.lacunarity.powf(self.octaves.saturating_sub(1) as f64);
        radius * top_frequency.max(1.0)
    }
}

// =============================================================================
// HEIGHT FIELD GENERATION
// =============================================================================

/// Generate a raw height field that tiles seamlessly with period (width, height).
///
/// Each axis is wrapped onto a circle and the pair of circles is sampled as a
/// torus in 4D Perlin noise. The circle radius is chosen so that one cell step
/// still advances `1 / base_scale` through noise space, which keeps the feature
/// size identical to sampling the plane at `(x / base_scale, y / base_scale)`.
///
/// Fails with `InvalidConfiguration` on empty dimensions or octave settings
/// that would push samples outside the noise lattice.
pub fn generate_heightmap(
    width: usize,
    height: usize,
    params: &NoiseParams,
    seeds: &TerrainSeeds,
) -> Result<Tilemap<f32>> {
    params.validate(width, height)?;
    let noise = Perlin::new(1).set_seed(seeds.heightmap_u32());

    let radius_x = width as f64 / (TAU * params.base_scale);
    let radius_y = height as f64 / (TAU * params.base_scale);

    // Circle coordinates only depend on one axis each
    let circle_x: Vec<(f64, f64)> = (0..width)
        .map(|x| {
            let angle = TAU * x as f64 / width as f64;
            (radius_x * angle.cos(), radius_x * angle.sin())
        })
        .collect();
    let circle_y: Vec<(f64, f64)> = (0..height)
        .map(|y| {
            let angle = TAU * y as f64 / height as f64;
            (radius_y * angle.cos(), radius_y * angle.sin())
        })
        .collect();

    Ok(Tilemap::from_fn(width, height, |x, y| {
        let (ax, bx) = circle_x[x];
        let (ay, by) = circle_y[y];
        fbm_torus(&noise, [ax, bx, ay, by], params) as f32
    }))
}

/// Fractional Brownian Motion over a 4D torus point.
fn fbm_torus(noise: &Perlin, point: [f64; 4], params: &NoiseParams) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..params.octaves {
        let sample = [
            point[0] * frequency,
            point[1] * frequency,
            point[2] * frequency,
            point[3] * frequency,
        ];
        total += amplitude * noise.get(sample);
        max_value += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    total / max_value
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Normalize heightmap values to the 0.0-1.0 range.
///
/// A perfectly flat field has no range to stretch, so it normalizes to all
/// zeros instead of dividing by zero.
pub fn normalize_heightmap(heightmap: &Tilemap<f32>) -> Tilemap<f32> {
    let (min_val, max_val) = heightmap.min_max();
    let range = max_val - min_val;

    if range <= 0.0 {
        tracing::debug!(value = min_val, "degenerate height field, normalizing to zero");
        return Tilemap::new_with(heightmap.width, heightmap.height, 0.0);
    }

    heightmap.map(|&val| (val - min_val) / range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NoiseParams {
        NoiseParams::from(&GenerationConfig::default())
    }

    #[test]
    fn test_same_seed_same_field() {
        let seeds = TerrainSeeds::from_master(42);
        let a = generate_heightmap(16, 12, &params(), &seeds).unwrap();
        let b = generate_heightmap(16, 12, &params(), &seeds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_field() {
        let a = generate_heightmap(16, 16, &params(), &TerrainSeeds::from_master(1)).unwrap();
        let b = generate_heightmap(16, 16, &params(), &TerrainSeeds::from_master(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_values_finite() {
        let field = generate_heightmap(20, 10, &params(), &TerrainSeeds::from_master(3)).unwrap();
        assert_eq!((field.width, field.height), (20, 10));
        assert!(field.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_field_tiles_across_seams() {
        // Wrapping neighbours across the seam should differ no more than
        // ordinary neighbours do inside the map.
        let p = NoiseParams { base_scale: 8.0, octaves: 3, persistence: 0.5, lacunarity: 2.0 };
        let field = generate_heightmap(32, 32, &p, &TerrainSeeds::from_master(9)).unwrap();

        let mut max_inner = 0.0f32;
        for y in 0..32 {
            for x in 0..31 {
                max_inner = max_inner.max((field.get(x, y) - field.get(x + 1, y)).abs());
            }
        }
        for y in 0..32 {
            let seam = (field.get(31, y) - field.get(0, y)).abs();
            assert!(seam <= max_inner * 1.5 + 1e-6, "seam jump {} vs {}", seam, max_inner);
        }
    }

    #[test]
    fn test_empty_field_rejected() {
        let seeds = TerrainSeeds::from_master(1);
        for (w, h) in [(0, 8), (8, 0)] {
            assert!(matches!(
                generate_heightmap(w, h, &params(), &seeds),
                Err(TerrainError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_runaway_frequency_rejected() {
        let seeds = TerrainSeeds::from_master(42);
        let deep = NoiseParams { octaves: 1100, ..params() };
        let steep = NoiseParams { octaves: 5, lacunarity: 1e100, ..params() };
        for p in [deep, steep] {
            assert!(matches!(
                generate_heightmap(10, 10, &p, &seeds),
                Err(TerrainError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_sample_reach() {
        let p = NoiseParams { base_scale: 1.0, octaves: 3, persistence: 0.5, lacunarity: 2.0 };
        let expected = 10.0 / TAU * 4.0;
        assert!((p.max_sample_coordinate(10, 4) - expected).abs() < 1e-9);
        // Shrinking lacunarity never lowers the base octave
        let shrinking = NoiseParams { lacunarity: 0.5, ..p };
        assert!((shrinking.max_sample_coordinate(10, 4) - 10.0 / TAU).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_bounds_exact() {
        let field = Tilemap::from_fn(7, 5, |x, y| (x as f32 * 1.3 - y as f32 * 0.7).sin() * 40.0);
        let normalized = normalize_heightmap(&field);
        let (lo, hi) = normalized.min_max();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn test_normalize_flat_field_is_zero() {
        let field = Tilemap::new_with(6, 4, 3.25f32);
        let normalized = normalize_heightmap(&field);
        assert!(normalized.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_normalize_preserves_order() {
        let field = Tilemap::from_fn(4, 1, |x, _| [5.0, -1.0, 2.0, 11.0][x]);
        let normalized = normalize_heightmap(&field);
        assert_eq!(normalized.values(), &[0.5, 0.0, 0.25, 1.0]);
    }
}
