//! Seed management for terrain generation
//!
//! Each randomized stage gets its own seed derived from the master seed, so
//! changing how forests are grown never reshuffles the height field.
//!
//! Derivation uses fixed mixers (FNV-1a over the stage name, then splitmix64)
//! so a master seed maps to the same map on every toolchain and platform.

/// Seeds for the randomized generation stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TerrainSeeds {
    /// Master seed (the one a user types in)
    pub master: u64,
    /// Perlin permutation table for the height field
    pub heightmap: u64,
    /// Forest patch placement and growth
    pub forests: u64,
}

impl TerrainSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            heightmap: derive_seed(master, "heightmap"),
            forests: derive_seed(master, "forests"),
        }
    }

    /// Perlin seeds are 32-bit.
    pub fn heightmap_u32(&self) -> u32 {
        (self.heightmap ^ (self.heightmap >> 32)) as u32
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: u64, stage: &str) -> u64 {
    splitmix64(master ^ fnv1a_64(stage.as_bytes()))
}

/// FNV-1a 64-bit hash of raw bytes.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001b3;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ b as u64).wrapping_mul(PRIME))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, heightmap: {}, forests: {} }}",
            self.master, self.heightmap, self.forests,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = TerrainSeeds::from_master(12345);
        let seeds2 = TerrainSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_stages_get_different_seeds() {
        let seeds = TerrainSeeds::from_master(12345);
        assert_ne!(seeds.heightmap, seeds.forests);
        assert_ne!(seeds.heightmap, TerrainSeeds::from_master(12346).heightmap);
    }

    #[test]
    fn test_mixers_are_pinned() {
        // Reference values; a change here reshuffles every saved seed
        assert_eq!(splitmix64(0), 0xe220a8397b1dcdaf);
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(
            derive_seed(42, "forests"),
            splitmix64(42 ^ fnv1a_64(b"forests"))
        );
    }
}
