//! Caller-owned occupancy overlay
//!
//! Simulation layers mark which tiles are taken (by a settlement, a unit, ...)
//! here instead of mutating the shared [`TerrainGrid`].

use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;
use crate::world::TerrainGrid;

/// One optional occupant per cell, sized to match a terrain grid.
#[derive(Clone, Debug)]
pub struct OccupancyMap<T> {
    cells: Tilemap<Option<T>>,
}

impl<T: Clone> OccupancyMap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Tilemap::new_with(width, height, None),
        }
    }

    /// Empty overlay with the same dimensions as `grid`.
    pub fn for_grid(grid: &TerrainGrid) -> Self {
        let (width, height) = grid.dimensions();
        Self::new(width, height)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cells.width, self.cells.height)
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if self.cells.contains(x, y) {
            Ok(())
        } else {
            Err(TerrainError::OutOfBounds {
                x,
                y,
                width: self.cells.width,
                height: self.cells.height,
            })
        }
    }

    /// Put `occupant` at (x, y), returning whoever was there before.
    pub fn place(&mut self, x: usize, y: usize, occupant: T) -> Result<Option<T>> {
        self.check(x, y)?;
        Ok(self.cells.get_mut(x, y).replace(occupant))
    }

    pub fn occupant(&self, x: usize, y: usize) -> Result<Option<&T>> {
        self.check(x, y)?;
        Ok(self.cells.get(x, y).as_ref())
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> Result<bool> {
        Ok(self.occupant(x, y)?.is_some())
    }

    /// Clear (x, y), returning the previous occupant.
    pub fn vacate(&mut self, x: usize, y: usize) -> Result<Option<T>> {
        self.check(x, y)?;
        Ok(self.cells.get_mut(x, y).take())
    }

    /// Occupied cells as (x, y, occupant).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.cells
            .iter()
            .filter_map(|(x, y, cell)| cell.as_ref().map(|occupant| (x, y, occupant)))
    }
}
