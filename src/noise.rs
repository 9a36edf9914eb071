//! Gradient-noise synthesis for the height field.
//!
//! One octave is classic lattice Perlin noise: random unit gradients on a
//! coarse lattice, per-cell dot products against the 4 surrounding
//! gradients, blended with the quintic smootherstep curve. The synthesizer
//! sums octaves at halving detail and amplitude, computing octaves in
//! parallel and merging them in a fixed order so output is deterministic.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::grid::ScalarGrid;
use crate::seeds::octave_seed;

/// Quintic ease curve `6t^5 - 15t^4 + 10t^3`, clamped outside `[0, 1]`.
///
/// Zero first and second derivative at both ends, so blended octaves meet
/// lattice lines without creases.
pub fn smootherstep(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    t * t * t * (t * (6.0 * t - 15.0) + 10.0)
}

/// Blend from `low` to `high` by the eased parameter `t`.
pub fn interpolate(t: f64, low: f64, high: f64) -> f64 {
    low + smootherstep(t) * (high - low)
}

/// Generate one octave of gradient noise.
///
/// `detail` is the lattice cell side in grid cells; the lattice carries one
/// uniformly random unit gradient per node, drawn row-major from a
/// `ChaCha8Rng` seeded with `seed`. Cell values sample the lattice cell
/// center (the 0.5 offset bias), so no cell lands exactly on a lattice
/// line.
pub fn generate_octave(width: usize, height: usize, detail: usize, seed: u64) -> ScalarGrid {
    assert!(detail > 0, "octave detail must be nonzero");

    // One gradient per lattice node, sized to cover a final partial cell
    // when the dimensions are not multiples of `detail`.
    let lattice_width = width.div_ceil(detail) + 1;
    let lattice_height = height.div_ceil(detail) + 1;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let gradients: Vec<DVec2> = (0..lattice_width * lattice_height)
        .map(|_| {
            let angle = rng.gen::<f64>() * TAU;
            DVec2::new(angle.cos(), angle.sin())
        })
        .collect();

    let mut grid = ScalarGrid::new(width, height);
    for y in 0..height {
        let lattice_y = y / detail;
        let offset_y = ((y % detail) as f64 + 0.5) / detail as f64;
        for x in 0..width {
            let lattice_x = x / detail;
            let offset_x = ((x % detail) as f64 + 0.5) / detail as f64;

            // Dot product of the offset vector with one of the 4 corner
            // gradients; offsets to the high corners run negative.
            let corner_dot = |high_x: bool, high_y: bool| -> f64 {
                let node_x = lattice_x + high_x as usize;
                let node_y = lattice_y + high_y as usize;
                let gradient = gradients[node_y * lattice_width + node_x];
                let offset = DVec2::new(
                    offset_x - if high_x { 1.0 } else { 0.0 },
                    offset_y - if high_y { 1.0 } else { 0.0 },
                );
                gradient.dot(offset)
            };

            let value = interpolate(
                offset_x,
                interpolate(offset_y, corner_dot(false, false), corner_dot(false, true)),
                interpolate(offset_y, corner_dot(true, false), corner_dot(true, true)),
            );
            grid.set(x, y, value);
        }
    }
    grid
}

/// The octave plan for a grid: `(octave index, detail)` pairs, descending
/// detail, halving from `min(width, height) >> 2` while detail stays above
/// `min_detail`.
pub fn octave_plan(width: usize, height: usize, min_detail: usize) -> Vec<(u32, usize)> {
    let base_detail = width.min(height) >> 2;
    let mut plan = Vec::new();
    let mut i = 0u32;
    while (base_detail >> i) > min_detail {
        plan.push((i, base_detail >> i));
        i += 1;
    }
    plan
}

/// Sum octaves of gradient noise into a composite field.
///
/// Octaves are data-independent, so they are generated in parallel, one
/// worker and one derived seed per octave. The merge runs single-threaded
/// in ascending octave order; floating-point rounding is therefore
/// reproducible no matter how the workers are scheduled. Octave `i` is
/// scaled by `1 / 2^i`, the whole field by `height_scale`, and the extrema
/// come from a final full rescan.
pub fn synthesize(
    width: usize,
    height: usize,
    min_detail: usize,
    height_scale: f64,
    seed: u64,
) -> ScalarGrid {
    let octaves: Vec<ScalarGrid> = octave_plan(width, height, min_detail)
        .into_par_iter()
        .map(|(i, detail)| generate_octave(width, height, detail, octave_seed(seed, i)))
        .collect();

    let mut composite = ScalarGrid::new(width, height);
    for (i, octave) in octaves.iter().enumerate() {
        composite += &(octave / (1u64 << i) as f64);
    }
    composite *= height_scale;
    composite.recalculate_extrema();
    composite
}
