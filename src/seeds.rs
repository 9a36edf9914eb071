//! Seed management for terrain generation
//!
//! Provides separate seeds for the noise synthesizer and the erosion
//! simulator, all derived deterministically from one master seed, plus the
//! per-octave worker seeds used during parallel synthesis.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeds for the terrain generation systems.
///
/// Each system gets its own seed derived from the master, so varying one
/// aspect of generation (say, rerunning erosion) never perturbs the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Gradient-noise synthesis (lattice angles per octave)
    pub noise: u64,
    /// Erosion simulation (droplet start positions)
    pub erosion: u64,
}

impl TerrainSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            noise: derive_seed(master, "noise"),
            erosion: derive_seed(master, "erosion"),
        }
    }
}

impl Default for TerrainSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive the seed for one noise octave from the noise seed.
///
/// Every octave worker owns an RNG seeded with this, so parallel octave
/// generation stays deterministic regardless of scheduling.
pub fn octave_seed(noise_seed: u64, octave: u32) -> u64 {
    let mut hasher = DefaultHasher::new();
    noise_seed.hash(&mut hasher);
    octave.hash(&mut hasher);
    hasher.finish()
}

/// Derive a sub-seed from a master seed and a system name.
/// Uses hashing to ensure different systems get different but deterministic seeds.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for TerrainSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TerrainSeeds {{ master: {}, noise: {}, erosion: {} }}",
            self.master, self.noise, self.erosion,
        )
    }
}
