//! Generation parameters and their JSON persistence.

use std::fs::File;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::erosion::ErosionParams;

/// Parameters for height-field synthesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Grid width in cells. Powers of two partition octaves cleanly;
    /// other sizes work but show lattice-boundary artifacts.
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Octave floor: synthesis stops before lattice cells shrink to this
    /// size or below
    pub min_detail: usize,
    /// Global multiplier applied to the summed field
    pub height_scale: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 512,        // Base map resolution
            height: 512,
            min_detail: 8,     // Finest lattice cell before octaves stop
            height_scale: 1.0, // Raw octave sum by default
        }
    }
}

/// The persisted parameter bundle.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub terrain: TerrainParams,
    pub erosion: ErosionParams,
}

/// Load a parameter bundle from a JSON file.
pub fn load_config(path: &str) -> std::io::Result<GeneratorConfig> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

/// Write a parameter bundle as pretty-printed JSON.
pub fn save_config(config: &GeneratorConfig, path: &str) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(())
}
