//! Procedural terrain generation for civilization simulations
//!
//! Turns a seed into a classified 2D terrain grid: layered Perlin noise,
//! min-max normalization, Gaussian smoothing, height-band classification and
//! organic forest patches. Start with [`generate_terrain`].

pub mod ascii;
pub mod config;
pub mod error;
pub mod forests;
pub mod heightmap;
pub mod occupancy;
pub mod seeds;
pub mod smoothing;
pub mod terrain;
pub mod tilemap;
pub mod world;

pub use config::GenerationConfig;
pub use error::{Result, TerrainError};
pub use forests::{ForestParams, ForestPatch};
pub use occupancy::OccupancyMap;
pub use terrain::{ClassificationThresholds, TerrainCategory};
pub use world::{generate_terrain, TerrainGrid, TileInfo};
