use std::fs::File;
use std::io::BufWriter;

use clap::Parser;
use civ_terrain::ascii::{self, AsciiMode};
use civ_terrain::config::RANDOM_SEED_RANGE;
use civ_terrain::seeds::TerrainSeeds;
use civ_terrain::{
    generate_terrain, ClassificationThresholds, ForestParams, ForestPatch, GenerationConfig,
    TerrainGrid,
};
use rand::Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "civ_terrain")]
#[command(about = "Generate procedural terrain maps for civilization simulations")]
struct Args {
    /// Width of the map in cells
    #[arg(short = 'W', long, default_value = "25")]
    width: usize,

    /// Height of the map in cells
    #[arg(short = 'H', long, default_value = "25")]
    height: usize,

    /// Random seed (picks one in 1-250 if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cells per unit of noise space (higher = broader features)
    #[arg(long, default_value = "40.0")]
    scale: f64,

    /// Number of noise octaves
    #[arg(long, default_value = "6")]
    octaves: u32,

    /// Amplitude decay per octave
    #[arg(long, default_value = "0.5")]
    persistence: f64,

    /// Frequency multiplier per octave
    #[arg(long, default_value = "2.0")]
    lacunarity: f64,

    /// Gaussian smoothing sigma (0 disables)
    #[arg(long, default_value = "3.0")]
    sigma: f64,

    /// Fraction of plains/hills cells that seed a forest patch
    #[arg(long, default_value = "0.05")]
    forest_probability: f64,

    /// Minimum forest patch size
    #[arg(long, default_value = "5")]
    min_forest: usize,

    /// Maximum forest patch size
    #[arg(long, default_value = "15")]
    max_forest: usize,

    /// Rows at each pole forced to tundra
    #[arg(long, default_value = "0")]
    tundra_rows: usize,

    /// Use the 0.3/0.5/0.7 height bands instead of 0.3/0.6/0.7
    #[arg(long)]
    legacy_thresholds: bool,

    /// Map view to print
    #[arg(long, value_enum, default_value = "terrain")]
    view: View,

    /// Print with ANSI colors (terrain view only)
    #[arg(long)]
    color: bool,

    /// Export map, legend and statistics to a text file
    #[arg(long)]
    export: Option<String>,

    /// Export config and category codes as JSON
    #[arg(long)]
    json: Option<String>,

    /// Print details for one cell
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    inspect: Option<Vec<usize>>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum View {
    Terrain,
    Base,
    Height,
}

impl From<View> for AsciiMode {
    fn from(view: View) -> Self {
        match view {
            View::Terrain => AsciiMode::Terrain,
            View::Base => AsciiMode::Base,
            View::Height => AsciiMode::Height,
        }
    }
}

#[derive(serde::Serialize)]
struct JsonExport<'a> {
    config: &'a GenerationConfig,
    seeds: &'a TerrainSeeds,
    terrain: Vec<Vec<u8>>,
    forest_patches: &'a [ForestPatch],
}

fn write_json(grid: &TerrainGrid, path: &str) -> civ_terrain::Result<()> {
    let export = JsonExport {
        config: grid.config(),
        seeds: grid.seeds(),
        terrain: grid.to_codes(),
        forest_patches: grid.forest_patches(),
    };
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &export)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("civ_terrain=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(RANDOM_SEED_RANGE));

    let config = GenerationConfig {
        width: args.width,
        height: args.height,
        base_scale: args.scale,
        octaves: args.octaves,
        persistence: args.persistence,
        lacunarity: args.lacunarity,
        seed,
        smooth_sigma: args.sigma,
        thresholds: if args.legacy_thresholds {
            ClassificationThresholds::legacy()
        } else {
            ClassificationThresholds::default()
        },
        forest: ForestParams {
            probability: args.forest_probability,
            min_size: args.min_forest,
            max_size: args.max_forest,
        },
        polar_tundra_rows: args.tundra_rows,
    };

    println!("Generating terrain with seed: {}", seed);
    println!("Map size: {}x{}", config.width, config.height);
    let grid = generate_terrain(config)?;

    if args.color && matches!(args.view, View::Terrain) {
        print!("{}", ascii::render_colored_ascii_map(&grid));
    } else {
        print!("{}", ascii::render_ascii_map(&grid, args.view.into()));
    }
    println!();
    print!("{}", ascii::terrain_legend());
    print!("{}", ascii::stats_report(&grid));

    if let Some([x, y]) = args.inspect.as_deref() {
        let tile = grid.tile_info(*x, *y)?;
        println!(
            "Cell ({}, {}): {} over {} base, elevation {:.3} ({})",
            tile.x,
            tile.y,
            tile.category,
            tile.base,
            tile.elevation,
            tile.category.description()
        );
    }

    if let Some(path) = &args.export {
        ascii::export_terrain_file(&grid, path)?;
        println!("Exported map to {}", path);
    }

    if let Some(path) = &args.json {
        write_json(&grid, path)?;
        println!("Exported JSON to {}", path);
    }

    Ok(())
}
