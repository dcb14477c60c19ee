//! Terrain categories and height-band classification

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;

/// Terrain category of a single cell. Discriminants are the stable integer codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainCategory {
    #[default]
    Water = 0,
    Plains = 1,
    Hills = 2,
    Mountains = 3,
    Forest = 4,
    Tundra = 5,
}

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 6] = [
        TerrainCategory::Water,
        TerrainCategory::Plains,
        TerrainCategory::Hills,
        TerrainCategory::Mountains,
        TerrainCategory::Forest,
        TerrainCategory::Tundra,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainCategory::Water => "Water",
            TerrainCategory::Plains => "Plains",
            TerrainCategory::Hills => "Hills",
            TerrainCategory::Mountains => "Mountains",
            TerrainCategory::Forest => "Forest",
            TerrainCategory::Tundra => "Tundra",
        }
    }

    /// Region description used when narrating a settlement's surroundings.
    pub fn description(&self) -> &'static str {
        match self {
            TerrainCategory::Water => "maritime",
            TerrainCategory::Plains => "fertile plains",
            TerrainCategory::Hills => "rolling hills",
            TerrainCategory::Mountains => "rugged mountains",
            TerrainCategory::Forest => "dense forest",
            TerrainCategory::Tundra => "harsh tundra",
        }
    }

    /// Whether forest may grow on this base terrain.
    pub fn is_forest_eligible(&self) -> bool {
        matches!(self, TerrainCategory::Plains | TerrainCategory::Hills)
    }
}

impl TryFrom<u8> for TerrainCategory {
    type Error = TerrainError;

    fn try_from(code: u8) -> Result<Self> {
        TerrainCategory::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| TerrainError::invalid(format!("unknown terrain code {}", code)))
    }
}

impl std::fmt::Display for TerrainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Upper bounds of the height bands; anything at or above `hills` is Mountains.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub water: f32,
    pub plains: f32,
    pub hills: f32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            water: 0.3,
            plains: 0.6,
            hills: 0.7,
        }
    }
}

impl ClassificationThresholds {
    /// Wider hill band used by the standalone map prototype.
    pub fn legacy() -> Self {
        Self {
            water: 0.3,
            plains: 0.5,
            hills: 0.7,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.water
            && self.water < self.plains
            && self.plains < self.hills
            && self.hills <= 1.0;
        if !ordered {
            return Err(TerrainError::invalid(format!(
                "thresholds must satisfy 0 <= water < plains < hills <= 1, got {:?}",
                self
            )));
        }
        Ok(())
    }

    pub fn classify(&self, value: f32) -> TerrainCategory {
        if value < self.water {
            TerrainCategory::Water
        } else if value < self.plains {
            TerrainCategory::Plains
        } else if value < self.hills {
            TerrainCategory::Hills
        } else {
            TerrainCategory::Mountains
        }
    }
}

/// Classify a normalized field, then force `polar_rows` rows at each pole to tundra.
pub fn classify_terrain(
    field: &Tilemap<f32>,
    thresholds: &ClassificationThresholds,
    polar_rows: usize,
) -> Tilemap<TerrainCategory> {
    let mut terrain = field.map(|&v| thresholds.classify(v));

    if polar_rows > 0 {
        let height = terrain.height;
        for (_, y, cell) in terrain.iter_mut() {
            if y < polar_rows || y + polar_rows >= height {
                *cell = TerrainCategory::Tundra;
            }
        }
    }

    terrain
}
