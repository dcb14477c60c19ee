//! Forest patch generation
//!
//! Grows irregular forest patches over plains and hills by randomized region
//! growing. One claim map is shared by every patch in a run, so patches never
//! overlap and a cell is inspected by at most one patch.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::terrain::TerrainCategory;
use crate::tilemap::Tilemap;

/// Forest overlay settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Fraction of eligible cells that seed a patch (0.0-1.0)
    pub probability: f64,
    /// Smallest target patch size in cells
    pub min_size: usize,
    /// Largest target patch size in cells
    pub max_size: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            probability: 0.05,
            min_size: 5,
            max_size: 15,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_size > self.max_size {
            return Err(TerrainError::invalid(format!(
                "min forest size {} exceeds max forest size {}",
                self.min_size, self.max_size
            )));
        }
        if self.min_size == 0 {
            return Err(TerrainError::invalid("min forest size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(TerrainError::invalid(format!(
                "forest probability must be in [0, 1], got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

/// A connected group of forest cells grown from one seed cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestPatch {
    /// Cell the patch grew from
    pub seed: (usize, usize),
    /// Size the patch was aiming for
    pub target_size: usize,
    /// Cells in the order they were claimed; `cells[0] == seed`
    pub cells: Vec<(usize, usize)>,
}

impl ForestPatch {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The patch stopped short of its target because it ran out of room.
    pub fn is_enclosed(&self) -> bool {
        self.cells.len() < self.target_size
    }
}

/// Overlay forests on `terrain`, returning the new grid and the patches grown.
///
/// Only plains and hills are ever converted. Fails eagerly on invalid `params`.
pub fn generate_forests<R: Rng>(
    terrain: &Tilemap<TerrainCategory>,
    params: &ForestParams,
    rng: &mut R,
) -> Result<(Tilemap<TerrainCategory>, Vec<ForestPatch>)> {
    params.validate()?;

    let mut eligible: Vec<(usize, usize)> = terrain
        .iter()
        .filter(|(_, _, c)| c.is_forest_eligible())
        .map(|(x, y, _)| (x, y))
        .collect();

    let num_patches = (eligible.len() as f64 * params.probability).floor() as usize;
    let mut forested = terrain.clone();
    if num_patches == 0 {
        return Ok((forested, Vec::new()));
    }

    // Shuffled once so patch seeds are drawn without replacement
    eligible.shuffle(rng);
    let mut claimed = Tilemap::new_with(terrain.width, terrain.height, false);
    let mut seeds = eligible.into_iter();
    let mut patches = Vec::with_capacity(num_patches);

    while patches.len() < num_patches {
        let Some(seed) = seeds.by_ref().find(|&(x, y)| !*claimed.get(x, y)) else {
            tracing::debug!(
                grown = patches.len(),
                wanted = num_patches,
                "no unclaimed forest seeds left"
            );
            break;
        };
        let target_size = rng.gen_range(params.min_size..=params.max_size);
        patches.push(grow_patch(terrain, &mut claimed, seed, target_size, rng));
    }

    for patch in &patches {
        for &(x, y) in &patch.cells {
            forested.set(x, y, TerrainCategory::Forest);
        }
    }

    Ok((forested, patches))
}

/// Grow a single patch from `seed` until it reaches `target_size` or has no
/// free neighbours left. Claims cells in `claimed` as it goes.
pub fn grow_patch<R: Rng>(
    terrain: &Tilemap<TerrainCategory>,
    claimed: &mut Tilemap<bool>,
    seed: (usize, usize),
    target_size: usize,
    rng: &mut R,
) -> ForestPatch {
    claimed.set(seed.0, seed.1, true);
    let mut cells = vec![seed];
    // Patch cells that may still border an unclaimed eligible cell
    let mut frontier = vec![seed];

    while cells.len() < target_size && !frontier.is_empty() {
        let idx = rng.gen_range(0..frontier.len());
        let (x, y) = frontier[idx];

        let mut around = terrain.neighbors(x, y);
        around.shuffle(rng);
        let next = around
            .into_iter()
            .find(|&(nx, ny)| !*claimed.get(nx, ny) && terrain.get(nx, ny).is_forest_eligible());

        match next {
            Some((nx, ny)) => {
                claimed.set(nx, ny, true);
                cells.push((nx, ny));
                frontier.push((nx, ny));
            }
            None => {
                frontier.swap_remove(idx);
            }
        }
    }

    ForestPatch {
        seed,
        target_size,
        cells,
    }
}
