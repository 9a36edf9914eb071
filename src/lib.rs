//! Terrain generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod erosion;
pub mod export;
pub mod grid;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod seeds;
pub mod terrain;
pub mod viewer;
