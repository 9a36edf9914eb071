//! The terrain aggregate.
//!
//! Owns the height field plus its parameters and seed state, and exposes
//! the narrow query/command interface everything downstream (mesh building,
//! export, the viewer) consumes. Regeneration builds a complete new grid
//! before swapping it in, so readers never observe a partial rebuild.

use std::time::Instant;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::erosion::{self, DropStats, ErosionParams, ErosionStats};
use crate::grid::ScalarGrid;
use crate::noise;
use crate::params::TerrainParams;
use crate::seeds::TerrainSeeds;

pub struct Terrain {
    grid: ScalarGrid,
    params: TerrainParams,
    erosion_params: ErosionParams,
    seeds: TerrainSeeds,
    erosion_rng: ChaCha8Rng,
}

impl Terrain {
    /// Synthesize a fresh terrain from a master seed.
    pub fn generate(
        params: TerrainParams,
        erosion_params: ErosionParams,
        master_seed: u64,
    ) -> Self {
        let seeds = TerrainSeeds::from_master(master_seed);
        let grid = build_grid(&params, &seeds);
        let erosion_rng = ChaCha8Rng::seed_from_u64(seeds.erosion);
        Self {
            grid,
            params,
            erosion_params,
            seeds,
            erosion_rng,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn height_at(&self, x: usize, y: usize) -> f64 {
        self.grid.get(x, y)
    }

    pub fn min_height(&self) -> f64 {
        self.grid.minimum()
    }

    pub fn max_height(&self) -> f64 {
        self.grid.maximum()
    }

    /// Surface normal at a cell; `amplification` exaggerates relief.
    pub fn normal_at(&self, x: usize, y: usize, amplification: f64) -> DVec3 {
        self.grid.normal_at(x, y, amplification)
    }

    pub fn seeds(&self) -> TerrainSeeds {
        self.seeds
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn erosion_params(&self) -> &ErosionParams {
        &self.erosion_params
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Rebuild the height field from fresh noise under a new master seed.
    ///
    /// The replacement grid is fully synthesized before the swap; the old
    /// field stays intact until then. The erosion RNG reseeds alongside.
    pub fn regenerate(&mut self, master_seed: u64) {
        self.seeds = TerrainSeeds::from_master(master_seed);
        let grid = build_grid(&self.params, &self.seeds);
        self.grid = grid;
        self.erosion_rng = ChaCha8Rng::seed_from_u64(self.seeds.erosion);
    }

    /// Walk one droplet from the given position.
    pub fn simulate_drop(&mut self, x: f64, y: f64) -> DropStats {
        erosion::simulate_drop(&mut self.grid, &self.erosion_params, x, y)
    }

    /// Walk one droplet from a random position.
    pub fn simulate_random_drop(&mut self) -> DropStats {
        erosion::simulate_random_drop(&mut self.grid, &self.erosion_params, &mut self.erosion_rng)
    }

    /// Run a batch of random droplets and rescan the extrema afterwards.
    pub fn erode(&mut self, drops: u32) -> ErosionStats {
        let start = Instant::now();
        let mut stats = ErosionStats::default();
        for _ in 0..drops {
            stats.absorb(erosion::simulate_random_drop(
                &mut self.grid,
                &self.erosion_params,
                &mut self.erosion_rng,
            ));
        }
        self.grid.recalculate_extrema();
        println!(
            "  Erosion: {} drops, {:.1} eroded, {:.1} deposited, {} exited ({:?})",
            stats.drops,
            stats.total_eroded,
            stats.total_deposited,
            stats.exited,
            start.elapsed()
        );
        stats
    }
}

fn build_grid(params: &TerrainParams, seeds: &TerrainSeeds) -> ScalarGrid {
    let plan = noise::octave_plan(params.width, params.height, params.min_detail);
    match (plan.first(), plan.last()) {
        (Some((_, coarsest)), Some((_, finest))) => println!(
            "Synthesizing {} octaves ({}x{}, lattice detail {} down to {})",
            plan.len(),
            params.width,
            params.height,
            coarsest,
            finest
        ),
        _ => println!(
            "Grid {}x{} too small for any octave above detail {}; field stays flat",
            params.width, params.height, params.min_detail
        ),
    }

    let start = Instant::now();
    let grid = noise::synthesize(
        params.width,
        params.height,
        params.min_detail,
        params.height_scale,
        seeds.noise,
    );
    println!("  Generation time: {:?}", start.elapsed());
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TerrainParams {
        TerrainParams {
            width: 64,
            height: 64,
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_matches_bare_synthesis() {
        let terrain = Terrain::generate(small_params(), ErosionParams::default(), 42);

        let seeds = TerrainSeeds::from_master(42);
        let expected = noise::synthesize(64, 64, 8, 1.0, seeds.noise);

        for (x, y, value) in expected.iter() {
            assert_eq!(terrain.height_at(x, y), value);
        }
        assert_eq!(terrain.min_height(), expected.minimum());
        assert_eq!(terrain.max_height(), expected.maximum());
    }

    #[test]
    fn test_accessors_reflect_inputs() {
        let terrain = Terrain::generate(small_params(), ErosionParams::default(), 42);
        assert_eq!(terrain.params().width, 64);
        assert_eq!(terrain.params().height, 64);
        assert_eq!(terrain.erosion_params().max_steps, 1000);
        assert_eq!(terrain.seeds(), TerrainSeeds::from_master(42));
    }

    #[test]
    fn test_regenerate_is_seed_deterministic() {
        let mut a = Terrain::generate(small_params(), ErosionParams::default(), 1);
        let b = Terrain::generate(small_params(), ErosionParams::default(), 2);

        a.regenerate(2);
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(a.height_at(x, y), b.height_at(x, y));
            }
        }
    }

    #[test]
    fn test_regenerate_changes_field() {
        let mut terrain = Terrain::generate(small_params(), ErosionParams::default(), 7);
        let before: Vec<f64> = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .map(|(x, y)| terrain.height_at(x, y))
            .collect();

        terrain.regenerate(8);
        let changed = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .zip(before)
            .any(|((x, y), old)| terrain.height_at(x, y) != old);
        assert!(changed);
    }

    #[test]
    fn test_interior_normals_are_unit_length() {
        let terrain = Terrain::generate(small_params(), ErosionParams::default(), 3);

        for y in 1..63 {
            for x in 1..63 {
                let n = terrain.normal_at(x, y, 1.0);
                assert!((n.length() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_simulate_drop_mutates_field() {
        let mut terrain = Terrain::generate(small_params(), ErosionParams::default(), 5);
        let before = terrain.height_at(20, 20);

        // The first transfer scatters a nonzero change across the four
        // cells around the start position.
        terrain.simulate_drop(20.5, 20.5);
        assert_ne!(terrain.height_at(20, 20), before);
    }

    #[test]
    fn test_erode_batch_restores_exact_extrema() {
        let mut terrain = Terrain::generate(small_params(), ErosionParams::default(), 11);
        let stats = terrain.erode(25);
        assert_eq!(stats.drops, 25);

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for y in 0..64 {
            for x in 0..64 {
                min = min.min(terrain.height_at(x, y));
                max = max.max(terrain.height_at(x, y));
            }
        }
        assert_eq!(terrain.min_height(), min);
        assert_eq!(terrain.max_height(), max);
    }

    #[test]
    fn test_random_drops_follow_owned_rng() {
        let mut a = Terrain::generate(small_params(), ErosionParams::default(), 9);
        let mut b = Terrain::generate(small_params(), ErosionParams::default(), 9);

        for _ in 0..5 {
            a.simulate_random_drop();
            b.simulate_random_drop();
        }
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(a.height_at(x, y), b.height_at(x, y));
            }
        }
    }
}
