use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use civ_terrain::heightmap::normalize_heightmap;
use civ_terrain::smoothing::gaussian_blur;
use civ_terrain::terrain::classify_terrain;
use civ_terrain::tilemap::Tilemap;
use civ_terrain::{
    generate_terrain, ClassificationThresholds, GenerationConfig, TerrainCategory, TerrainError,
    TerrainGrid,
};

fn scenario_config(seed: u64) -> GenerationConfig {
    GenerationConfig {
        width: 10,
        height: 10,
        base_scale: 10.0,
        octaves: 4,
        persistence: 0.5,
        lacunarity: 2.0,
        seed,
        ..Default::default()
    }
}

fn grid_hash(grid: &TerrainGrid) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.to_codes().hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_scenario_seed_42() {
    let grid = generate_terrain(scenario_config(42)).unwrap();
    assert_eq!(grid.dimensions(), (10, 10));
    for (_, _, category) in grid.cells() {
        assert!(category.code() <= 4, "unexpected category {:?}", category);
    }
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate_terrain(scenario_config(42)).unwrap();
    let b = generate_terrain(scenario_config(42)).unwrap();
    assert_eq!(a.categories(), b.categories());
    assert_eq!(a.elevation_map(), b.elevation_map());
    assert_eq!(a.forest_patches(), b.forest_patches());
}

#[test]
fn test_seeds_produce_different_grids() {
    let hashes: HashSet<u64> = (1..=20)
        .map(|seed| grid_hash(&generate_terrain(scenario_config(seed)).unwrap()))
        .collect();
    assert!(hashes.len() > 1);

    let larger = |seed| {
        GenerationConfig { smooth_sigma: 1.0, ..GenerationConfig::new(32, 32, seed) }
    };
    let a = generate_terrain(larger(42)).unwrap();
    let b = generate_terrain(larger(43)).unwrap();
    assert_ne!(a.categories(), b.categories());
}

#[test]
fn test_zero_width_rejected() {
    let result = generate_terrain(GenerationConfig { width: 0, ..scenario_config(1) });
    assert!(matches!(result, Err(TerrainError::InvalidConfiguration(_))));
}

#[test]
fn test_inverted_forest_sizes_rejected() {
    let mut config = scenario_config(1);
    config.forest.min_size = 10;
    config.forest.max_size = 5;
    assert!(matches!(generate_terrain(config), Err(TerrainError::InvalidConfiguration(_))));
}

#[test]
fn test_runaway_octaves_rejected() {
    for config in [
        GenerationConfig { octaves: 1100, ..GenerationConfig::new(10, 10, 42) },
        GenerationConfig { lacunarity: 1e100, octaves: 5, ..GenerationConfig::new(10, 10, 42) },
    ] {
        assert!(matches!(generate_terrain(config), Err(TerrainError::InvalidConfiguration(_))));
    }
}

#[test]
fn test_sigma_wider_than_map_flattens_elevation() {
    let grid =
        generate_terrain(GenerationConfig { smooth_sigma: 1e18, ..GenerationConfig::new(10, 10, 42) })
            .unwrap();
    let (lo, hi) = grid.elevation_map().min_max();
    assert!(hi - lo < 1e-4, "elevation spread {}", hi - lo);
}

#[test]
fn test_constant_field_classifies_as_water() {
    let flat = Tilemap::new_with(8, 8, 0.42f32);
    let normalized = normalize_heightmap(&flat);
    assert!(normalized.values().iter().all(|&v| v == 0.0));

    let smoothed = gaussian_blur(&normalized, 3.0);
    let terrain = classify_terrain(&smoothed, &ClassificationThresholds::default(), 0);
    assert!(terrain.values().iter().all(|&c| c == TerrainCategory::Water));
}

fn patch_is_connected(cells: &[(usize, usize)]) -> bool {
    let set: HashSet<_> = cells.iter().copied().collect();
    let mut seen = HashSet::from([cells[0]]);
    let mut queue = VecDeque::from([cells[0]]);
    while let Some((x, y)) = queue.pop_front() {
        let candidates = [
            x.checked_sub(1).map(|nx| (nx, y)),
            Some((x + 1, y)),
            y.checked_sub(1).map(|ny| (x, ny)),
            Some((x, y + 1)),
        ];
        for next in candidates.into_iter().flatten() {
            if set.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == set.len()
}

#[test]
fn test_forest_invariants_across_seeds() {
    for seed in 0..10 {
        let mut config = GenerationConfig {
            smooth_sigma: 1.5,
            base_scale: 12.0,
            ..GenerationConfig::new(40, 30, seed)
        };
        config.forest.probability = 0.08;
        config.forest.min_size = 3;
        config.forest.max_size = 10;
        let grid = generate_terrain(config.clone()).unwrap();

        let mut claimed = HashSet::new();
        for patch in grid.forest_patches() {
            assert_eq!(patch.cells[0], patch.seed);
            assert!(patch_is_connected(&patch.cells), "seed {} patch {:?}", seed, patch.seed);
            assert!(patch.len() <= config.forest.max_size);
            assert!(patch.len() >= config.forest.min_size || patch.is_enclosed());
            for &(x, y) in &patch.cells {
                assert!(claimed.insert((x, y)), "cell ({}, {}) in two patches", x, y);
                assert_eq!(grid.get(x, y).unwrap(), TerrainCategory::Forest);
                assert!(grid.base_category(x, y).unwrap().is_forest_eligible());
            }
        }

        let forest_cells = grid
            .cells()
            .filter(|&(_, _, c)| c == TerrainCategory::Forest)
            .count();
        assert_eq!(forest_cells, claimed.len());
    }
}

#[test]
fn test_grid_shared_across_threads() {
    let grid = std::sync::Arc::new(generate_terrain(scenario_config(42)).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let grid = std::sync::Arc::clone(&grid);
            std::thread::spawn(move || grid.get(i, i).unwrap())
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), grid.get(i, i).unwrap());
    }
}
