//! Profiling tool to identify performance bottlenecks

use std::time::Instant;

use terrain_generator::{
    mesh, noise,
    erosion::ErosionParams,
    params::TerrainParams,
    seeds::{octave_seed, TerrainSeeds},
    terrain::Terrain,
};

fn main() {
    let width = 512;
    let height = 512;
    let seed = 1337u64;
    let drops = 10_000u32;

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let params = TerrainParams {
        width,
        height,
        ..TerrainParams::default()
    };
    let seeds = TerrainSeeds::from_master(seed);

    // Profile each octave on its own, single threaded
    let plan = noise::octave_plan(width, height, params.min_detail);
    let mut octave_total = std::time::Duration::ZERO;
    for &(octave, detail) in &plan {
        let start = Instant::now();
        let grid = noise::generate_octave(width, height, detail, octave_seed(seeds.noise, octave));
        let elapsed = start.elapsed();
        octave_total += elapsed;
        println!(
            "Octave {} (detail {:>3}): {:?} (range {:.3} to {:.3})",
            octave,
            detail,
            elapsed,
            grid.minimum(),
            grid.maximum()
        );
    }
    println!("Serial octave total: {:?}", octave_total);
    println!();

    // Profile the full parallel synthesis
    let start = Instant::now();
    let mut terrain = Terrain::generate(params, ErosionParams::default(), seed);
    let synthesis_time = start.elapsed();
    println!("Parallel synthesis: {:?}", synthesis_time);

    // Profile mesh production
    let start = Instant::now();
    let vertices = mesh::vertices(&terrain);
    let indices = mesh::indices(terrain.width(), terrain.height());
    let mesh_time = start.elapsed();
    println!(
        "Mesh production: {:?} ({} vertices, {} triangles)",
        mesh_time,
        vertices.len(),
        indices.len() / 3
    );

    // Profile erosion (the big one)
    println!("\nErosion parameters:");
    println!("  Erosion rate: {}", terrain.erosion_params().erosion_rate);
    println!(
        "  Deposition rate: {}",
        terrain.erosion_params().deposition_rate
    );
    println!("  Step budget: {}", terrain.erosion_params().max_steps);
    println!();

    let start = Instant::now();
    let stats = terrain.erode(drops);
    let erosion_time = start.elapsed();
    println!("Total erosion simulation: {:?}", erosion_time);
    println!(
        "  {:.0} drops/s",
        drops as f64 / erosion_time.as_secs_f64()
    );
    println!("  Eroded: {:.3} units", stats.total_eroded);
    println!("  Deposited: {:.3} units", stats.total_deposited);

    // Summary
    let total = synthesis_time + mesh_time + erosion_time;
    println!("\n=== Summary ===");
    println!("Synthesis: {:>8.2}% ({:?})", 100.0 * synthesis_time.as_secs_f64() / total.as_secs_f64(), synthesis_time);
    println!("Mesh:      {:>8.2}% ({:?})", 100.0 * mesh_time.as_secs_f64() / total.as_secs_f64(), mesh_time);
    println!("Erosion:   {:>8.2}% ({:?})", 100.0 * erosion_time.as_secs_f64() / total.as_secs_f64(), erosion_time);
    println!("─────────────────────────────────");
    println!("TOTAL:     {:>8}  {:?}", "100%", total);
}
