//! ASCII rendering and export for terrain grids
//!
//! Provides functions to render a generated map as text and write it to a file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::terrain::TerrainCategory;
use crate::world::TerrainGrid;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Final terrain, forests included
    Terrain,
    /// Classification before forests
    Base,
    /// Smoothed elevation gradient
    Height,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Base => "Base",
            AsciiMode::Height => "Height",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Terrain, AsciiMode::Base, AsciiMode::Height]
    }
}

/// Get ASCII character for a terrain category
pub fn terrain_char(category: TerrainCategory) -> char {
    match category {
        TerrainCategory::Water => '~',
        TerrainCategory::Plains => '.',
        TerrainCategory::Hills => 'n',
        TerrainCategory::Mountains => '^',
        TerrainCategory::Forest => 'T',
        TerrainCategory::Tundra => ':',
    }
}

/// Get ASCII character for a normalized elevation (0.0-1.0)
pub fn height_char(elevation: f32) -> char {
    const CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    let idx = (elevation.clamp(0.0, 1.0) * (CHARS.len() - 1) as f32) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// Display color for a terrain category
pub fn terrain_color(category: TerrainCategory) -> (u8, u8, u8) {
    match category {
        TerrainCategory::Water => (0, 0, 255),
        TerrainCategory::Plains => (0, 255, 0),
        TerrainCategory::Hills => (139, 69, 19),
        TerrainCategory::Mountains => (128, 128, 128),
        TerrainCategory::Forest => (34, 139, 34),
        TerrainCategory::Tundra => (220, 230, 240),
    }
}

/// Render a map to an ASCII string, one line per row
pub fn render_ascii_map(grid: &TerrainGrid, mode: AsciiMode) -> String {
    let (width, height) = grid.dimensions();
    let mut result = String::with_capacity((width + 1) * height);

    for y in 0..height {
        for x in 0..width {
            let ch = match mode {
                AsciiMode::Terrain => terrain_char(*grid.categories().get(x, y)),
                AsciiMode::Base => terrain_char(*grid.base_categories().get(x, y)),
                AsciiMode::Height => height_char(*grid.elevation_map().get(x, y)),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Render the terrain view with ANSI true-color backgrounds
pub fn render_colored_ascii_map(grid: &TerrainGrid) -> String {
    let (width, height) = grid.dimensions();
    let mut result = String::new();

    for y in 0..height {
        for x in 0..width {
            let category = *grid.categories().get(x, y);
            let (r, g, b) = terrain_color(category);
            result.push_str(&format!(
                "\x1b[38;2;0;0;0m\x1b[48;2;{};{};{}m{}\x1b[0m",
                r,
                g,
                b,
                terrain_char(category)
            ));
        }
        result.push('\n');
    }

    result
}

/// Generate legend for terrain characters
pub fn terrain_legend() -> String {
    let mut legend = String::from("=== TERRAIN LEGEND ===\n");
    for category in TerrainCategory::ALL {
        legend.push_str(&format!(
            "  {} {:<10} ({})\n",
            terrain_char(category),
            category.display_name(),
            category.description()
        ));
    }
    legend
}

/// Per-category cell counts with percentages
pub fn stats_report(grid: &TerrainGrid) -> String {
    let (width, height) = grid.dimensions();
    let total = (width * height) as f64;
    let mut report = String::from("=== TERRAIN STATISTICS ===\n");
    for (category, count) in grid.category_counts() {
        report.push_str(&format!(
            "  {:<10} {:>6} ({:.1}%)\n",
            category.display_name(),
            count,
            100.0 * count as f64 / total
        ));
    }
    report.push_str(&format!("  Forest patches: {}\n", grid.forest_patches().len()));
    report
}

/// Export the map, legend and statistics to a text file
pub fn export_terrain_file(grid: &TerrainGrid, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;
    let (width, height) = grid.dimensions();

    writeln!(file, "=== CIV TERRAIN MAP FILE ===")?;
    writeln!(file, "Seed: {}", grid.seed())?;
    writeln!(file, "Size: {}x{}", width, height)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(grid, mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", terrain_legend())?;
    writeln!(file)?;
    write!(file, "{}", stats_report(grid))?;

    Ok(())
}
