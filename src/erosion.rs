//! Droplet-based erosion simulation.
//!
//! One erosion event walks a single water droplet across the height field.
//! Each step reads the surface normal under the droplet, transfers mass
//! between the droplet's sediment load and the field (scattered at the
//! continuous position), then advances the droplet along the slope. The
//! walk ends when the step budget runs out or the droplet leaves the
//! domain; a drop that spends its whole budget inside the field drains,
//! deducting a fixed unit at its origin cell.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::grid::ScalarGrid;

/// Parameters for the droplet walk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErosionParams {
    /// Fraction of the sediment load returned to the field per step,
    /// scaled by the normal's y component
    pub deposition_rate: f64,
    /// Mass carved from the field per step on fully steep ground
    pub erosion_rate: f64,
    /// Damping applied to the x velocity each step
    pub friction: f64,
    /// Step budget before the droplet drains in place
    pub max_steps: u32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            deposition_rate: 0.1, // Settle 10% of the load per flat step
            erosion_rate: 0.1,    // Carve up to 0.1 units per step
            friction: 0.5,        // Halve lateral momentum each step
            max_steps: 1000,      // Drain after 1000 steps in the field
        }
    }
}

/// Outcome of one droplet walk.
#[derive(Clone, Copy, Debug, Default)]
pub struct DropStats {
    /// Steps taken before termination
    pub steps: u32,
    /// Total mass carved from the field, including the terminal drain
    pub eroded: f64,
    /// Total mass settled back into the field
    pub deposited: f64,
    /// Whether the droplet left the domain before its budget ran out
    pub exited: bool,
}

/// Cumulative results over a batch of droplets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErosionStats {
    pub drops: u32,
    pub total_eroded: f64,
    pub total_deposited: f64,
    /// Droplets that left the domain instead of draining
    pub exited: u32,
}

impl ErosionStats {
    pub fn absorb(&mut self, drop: DropStats) {
        self.drops += 1;
        self.total_eroded += drop.eroded;
        self.total_deposited += drop.deposited;
        if drop.exited {
            self.exited += 1;
        }
    }
}

/// The transient droplet state for one erosion event.
struct Droplet {
    /// Continuous position inside the domain
    position: DVec2,
    /// Velocity carried between steps
    velocity: DVec2,
    /// Signed sediment load
    sediment: f64,
}

impl Droplet {
    fn new(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::ZERO,
            sediment: 0.0,
        }
    }
}

/// Walk one droplet from `(start_x, start_y)`.
///
/// Per step:
/// 1. Read the unamplified normal at the cell under the droplet.
/// 2. `change = sediment * deposition_rate * normal.y - erosion_rate * (1 - normal.y)`
/// 3. Add `change` to the sediment load and scatter it into the field at
///    the continuous position.
/// 4. `vel.x = vel.x * friction + normal.x * friction`; `vel.y += normal.y`.
/// 5. Advance the position by the velocity.
///
/// The start position must lie inside the domain. A degenerate (NaN)
/// normal propagates through the arithmetic; the step budget still bounds
/// the walk.
pub fn simulate_drop(
    grid: &mut ScalarGrid,
    params: &ErosionParams,
    start_x: f64,
    start_y: f64,
) -> DropStats {
    let origin = (start_x as usize, start_y as usize);
    let mut droplet = Droplet::new(start_x, start_y);
    let mut stats = DropStats::default();

    for _ in 0..params.max_steps {
        let normal = grid.normal_at(
            droplet.position.x as usize,
            droplet.position.y as usize,
            1.0,
        );

        let change = droplet.sediment * params.deposition_rate * normal.y
            - params.erosion_rate * (1.0 - normal.y);
        droplet.sediment += change;
        grid.put(droplet.position.x, droplet.position.y, change);
        if change < 0.0 {
            stats.eroded -= change;
        } else {
            stats.deposited += change;
        }

        droplet.velocity.x = droplet.velocity.x * params.friction + normal.x * params.friction;
        droplet.velocity.y += normal.y;
        droplet.position += droplet.velocity;

        stats.steps += 1;
        if !in_domain(grid, droplet.position) {
            stats.exited = true;
            return stats;
        }
    }

    // Budget spent without leaving: the drop drains where it first landed.
    let drained = grid.get(origin.0, origin.1) - 1.0;
    grid.set(origin.0, origin.1, drained);
    stats.eroded += 1.0;
    stats
}

/// Drop a droplet at a uniformly random position inside the domain.
pub fn simulate_random_drop(
    grid: &mut ScalarGrid,
    params: &ErosionParams,
    rng: &mut ChaCha8Rng,
) -> DropStats {
    let x = rng.gen_range(0.0..grid.width as f64);
    let y = rng.gen_range(0.0..grid.height as f64);
    simulate_drop(grid, params, x, y)
}

// NaN positions compare false on both bounds and stay "inside"; the step
// budget is what bounds those walks.
fn in_domain(grid: &ScalarGrid, position: DVec2) -> bool {
    !(position.x < 0.0
        || position.y < 0.0
        || position.x >= grid.width as f64
        || position.y >= grid.height as f64)
}
