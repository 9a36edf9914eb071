//! Plain vertex/index buffers for an external renderer.
//!
//! The terrain produces owned, renderer-agnostic data: one vertex per grid
//! cell and two triangles per cell of the quad lattice. Whatever consumes
//! them (a GPU uploader, an .obj writer) copies or takes ownership on its
//! side; nothing here knows about graphics APIs.

use glam::DVec3;

use crate::terrain::Terrain;

/// Vertical scale applied to heights when building vertex positions.
pub const VERTICAL_SCALE: f64 = 0.15;

/// Relief exaggeration baked into the mesh normals.
pub const NORMAL_AMPLIFICATION: f64 = 60.0 * VERTICAL_SCALE;

/// Flat base color of the terrain surface.
pub const BASE_COLOR: DVec3 = DVec3::new(0.875, 0.125, 0.125);

/// One mesh vertex, plain data only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainVertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub color: DVec3,
}

/// Build one vertex per grid cell.
///
/// Positions are centered on the origin and divided by the short grid
/// side, so the footprint spans about a unit regardless of resolution;
/// heights ride in z under [`VERTICAL_SCALE`].
pub fn vertices(terrain: &Terrain) -> Vec<TerrainVertex> {
    let width = terrain.width();
    let height = terrain.height();
    let short_side = width.min(height) as f64;
    let half_width = (width / 2) as f64;
    let half_height = (height / 2) as f64;

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            out.push(TerrainVertex {
                position: DVec3::new(
                    (x as f64 - half_width) / short_side,
                    (y as f64 - half_height) / short_side,
                    terrain.height_at(x, y) * VERTICAL_SCALE,
                ),
                normal: terrain.normal_at(x, y, NORMAL_AMPLIFICATION),
                color: BASE_COLOR,
            });
        }
    }
    out
}

/// Triangle indices over the vertex lattice, two triangles per quad,
/// row-major, matching the layout of [`vertices`].
pub fn indices(width: usize, height: usize) -> Vec<u32> {
    let index = |x: usize, y: usize| (y * width + x) as u32;

    let mut out = Vec::with_capacity(6 * width.saturating_sub(1) * height.saturating_sub(1));
    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            out.push(index(x, y));
            out.push(index(x, y + 1));
            out.push(index(x + 1, y));

            out.push(index(x + 1, y));
            out.push(index(x, y + 1));
            out.push(index(x + 1, y + 1));
        }
    }
    out
}
