use clap::Parser;

use terrain_generator::params::{self, GeneratorConfig};
use terrain_generator::terrain::Terrain;
use terrain_generator::{export, viewer};

#[derive(Parser, Debug)]
#[command(name = "terrain_generator")]
#[command(about = "Generate procedural heightfield terrain with droplet erosion")]
struct Args {
    /// Width of the terrain grid in cells (powers of two recommended)
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Height of the terrain grid in cells
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Global height multiplier applied after octave summation
    #[arg(long, default_value = "1.0")]
    height_scale: f64,

    /// Number of random erosion droplets to run after generation
    #[arg(short, long, default_value = "0")]
    drops: u32,

    /// Load generation parameters from a JSON config (overrides size flags)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the effective parameters to a JSON config and exit
    #[arg(long)]
    write_config: Option<String>,

    /// Relief exaggeration for the normal and shaded exports
    #[arg(long, default_value = "9.0")]
    amplification: f64,

    /// Export the height field to a grayscale PNG
    #[arg(long)]
    export: Option<String>,

    /// Export the surface normals to an RGB PNG
    #[arg(long)]
    export_normals: Option<String>,

    /// Export a hillshaded relief PNG
    #[arg(long)]
    export_shaded: Option<String>,

    /// Open the interactive viewer after generation
    #[arg(long)]
    view: bool,
}

fn main() {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(ref path) = args.write_config {
        if let Err(e) = params::save_config(&config, path) {
            eprintln!("Failed to write config: {}", e);
            std::process::exit(1);
        }
        println!("Wrote config to: {}", path);
        return;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Generating terrain with seed: {}", seed);
    println!(
        "Map size: {}x{}",
        config.terrain.width, config.terrain.height
    );

    let mut terrain = Terrain::generate(config.terrain, config.erosion, seed);
    println!("Seeds: {}", terrain.seeds());
    println!(
        "Height range: {:.2} to {:.2}",
        terrain.min_height(),
        terrain.max_height()
    );

    if args.drops > 0 {
        println!("Simulating {} erosion droplets...", args.drops);
        terrain.erode(args.drops);
        println!(
            "Post-erosion range: {:.2} to {:.2}",
            terrain.min_height(),
            terrain.max_height()
        );
    }

    if let Some(ref path) = args.export {
        match export::export_heightmap(&terrain, path) {
            Ok(()) => println!("Exported heightmap to: {}", path),
            Err(e) => eprintln!("Failed to export heightmap: {}", e),
        }
    }

    if let Some(ref path) = args.export_normals {
        match export::export_normal_map(&terrain, path, args.amplification) {
            Ok(()) => println!("Exported normal map to: {}", path),
            Err(e) => eprintln!("Failed to export normal map: {}", e),
        }
    }

    if let Some(ref path) = args.export_shaded {
        match export::export_shaded(&terrain, path, args.amplification) {
            Ok(()) => println!("Exported shaded relief to: {}", path),
            Err(e) => eprintln!("Failed to export shaded relief: {}", e),
        }
    }

    if args.view {
        viewer::run_viewer(&mut terrain);
    }
}

/// Resolve the effective parameters: a JSON config when given, otherwise
/// the CLI flags over the defaults.
fn build_config(args: &Args) -> std::io::Result<GeneratorConfig> {
    match args.config {
        Some(ref path) => params::load_config(path),
        None => {
            let mut config = GeneratorConfig::default();
            config.terrain.width = args.width;
            config.terrain.height = args.height;
            config.terrain.height_scale = args.height_scale;
            Ok(config)
        }
    }
}
