//! Dense 2D scalar field used for the height map.
//!
//! The grid owns its samples and tracks a running minimum/maximum. All
//! mutation goes through `set`/`put` so the extrema stay consistent;
//! whole-grid operations finish with a full rescan.

use glam::DVec3;

/// A fixed-size 2D field of `f64` samples.
///
/// Width and height are fixed at construction. Powers of two give clean
/// octave partitioning during noise synthesis; other sizes work but leave
/// lattice-boundary artifacts.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarGrid {
    pub width: usize,
    pub height: usize,
    data: Vec<f64>,
    minimum: f64,
    maximum: f64,
}

impl ScalarGrid {
    /// Create a zeroed grid with `minimum == maximum == 0`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
            minimum: 0.0,
            maximum: 0.0,
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "grid access ({}, {}) outside {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Overwrite one cell, updating the running extrema in O(1).
    ///
    /// The incremental update is a high-water-mark: overwriting the current
    /// extreme cell with a tamer value leaves the stale extremum in place.
    /// Call [`recalculate_extrema`](Self::recalculate_extrema) after bulk
    /// mutation when exact bounds matter.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = value;
        if value < self.minimum {
            self.minimum = value;
        }
        if value > self.maximum {
            self.maximum = value;
        }
    }

    /// Fill every cell with one value and collapse the extrema onto it.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
        self.minimum = value;
        self.maximum = value;
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Recompute the extrema with a full scan.
    ///
    /// This is the authoritative recompute; every bulk mutation path
    /// (octave accumulation, whole-grid operators, erosion batches) ends
    /// with it.
    pub fn recalculate_extrema(&mut self) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for &value in &self.data {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
        if self.data.is_empty() {
            min = 0.0;
            max = 0.0;
        }
        self.minimum = min;
        self.maximum = max;
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(move |(idx, &val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    // =========================================================================
    // CONTINUOUS-COORDINATE GATHER / SCATTER
    // =========================================================================

    /// Read the field at a continuous coordinate.
    ///
    /// Exact integer coordinates return the cell value directly. Fractional
    /// coordinates blend the 4 enclosing cells weighted by inverse Euclidean
    /// distance to each corner, normalized by the weight sum. This is the
    /// corner-distance scheme, deliberately not bilinear area weighting.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if x.fract() == 0.0 && y.fract() == 0.0 {
            return self.get(x as usize, y as usize);
        }

        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for (cx, cy) in self.corners(x, y) {
            // Distance is nonzero here: the exact-corner case took the
            // integer fast path above.
            let weight = 1.0 / (x - cx as f64).hypot(y - cy as f64);
            total += self.get(cx, cy) * weight;
            weight_sum += weight;
        }
        total / weight_sum
    }

    /// Scatter `value` into the field at a continuous coordinate.
    ///
    /// The inverse of [`sample`](Self::sample): the value is added across
    /// the 4 enclosing cells with the same normalized inverse-distance
    /// weights. Integer coordinates add wholly to that one cell.
    pub fn put(&mut self, x: f64, y: f64, value: f64) {
        if x.fract() == 0.0 && y.fract() == 0.0 {
            let (cx, cy) = (x as usize, y as usize);
            let updated = self.get(cx, cy) + value;
            self.set(cx, cy, updated);
            return;
        }

        let corners = self.corners(x, y);
        let mut weights = [0.0; 4];
        let mut weight_sum = 0.0;
        for (i, &(cx, cy)) in corners.iter().enumerate() {
            weights[i] = 1.0 / (x - cx as f64).hypot(y - cy as f64);
            weight_sum += weights[i];
        }
        for (i, &(cx, cy)) in corners.iter().enumerate() {
            let updated = self.get(cx, cy) + value * weights[i] / weight_sum;
            self.set(cx, cy, updated);
        }
    }

    /// The 4 integer cells enclosing a continuous coordinate, with the high
    /// corner clamped at the domain edge instead of reading past it.
    fn corners(&self, x: f64, y: f64) -> [(usize, usize); 4] {
        let low_x = x.floor() as usize;
        let low_y = y.floor() as usize;
        let high_x = (low_x + 1).min(self.width - 1);
        let high_y = (low_y + 1).min(self.height - 1);
        [
            (low_x, low_y),
            (high_x, low_y),
            (low_x, high_y),
            (high_x, high_y),
        ]
    }

    // =========================================================================
    // DERIVED NORMALS
    // =========================================================================

    /// Surface normal at a cell from central differences of its neighbors.
    ///
    /// At the domain edge the missing neighbor index is clamped to the cell
    /// itself (one-sided difference). `amplification` scales the height
    /// deltas before the cross product, exaggerating relief for shading.
    /// A degenerate neighborhood (1x1 grid) produces a NaN normal; callers
    /// tolerate it.
    pub fn normal_at(&self, x: usize, y: usize, amplification: f64) -> DVec3 {
        let low_x = if x == 0 { x } else { x - 1 };
        let high_x = if x == self.width - 1 { x } else { x + 1 };
        let low_y = if y == 0 { y } else { y - 1 };
        let high_y = if y == self.height - 1 { y } else { y + 1 };

        let x_diff = DVec3::new(
            (high_x - low_x) as f64,
            0.0,
            amplification * (self.get(high_x, y) - self.get(low_x, y)),
        );
        let y_diff = DVec3::new(
            0.0,
            (high_y - low_y) as f64,
            amplification * (self.get(x, high_y) - self.get(x, low_y)),
        );

        x_diff.cross(y_diff).normalize()
    }
}

// =============================================================================
// ELEMENTWISE OPERATORS
// =============================================================================

fn assert_same_shape(a: &ScalarGrid, b: &ScalarGrid) {
    assert!(
        a.width == b.width && a.height == b.height,
        "grid shape mismatch: {}x{} vs {}x{}",
        a.width,
        a.height,
        b.width,
        b.height
    );
}

impl std::ops::AddAssign<&ScalarGrid> for ScalarGrid {
    fn add_assign(&mut self, rhs: &ScalarGrid) {
        assert_same_shape(self, rhs);
        for (cell, &other) in self.data.iter_mut().zip(&rhs.data) {
            *cell += other;
        }
        self.recalculate_extrema();
    }
}

impl std::ops::Add<&ScalarGrid> for &ScalarGrid {
    type Output = ScalarGrid;

    fn add(self, rhs: &ScalarGrid) -> ScalarGrid {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl std::ops::SubAssign<&ScalarGrid> for ScalarGrid {
    fn sub_assign(&mut self, rhs: &ScalarGrid) {
        assert_same_shape(self, rhs);
        for (cell, &other) in self.data.iter_mut().zip(&rhs.data) {
            *cell -= other;
        }
        self.recalculate_extrema();
    }
}

impl std::ops::Sub<&ScalarGrid> for &ScalarGrid {
    type Output = ScalarGrid;

    fn sub(self, rhs: &ScalarGrid) -> ScalarGrid {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl std::ops::Neg for &ScalarGrid {
    type Output = ScalarGrid;

    fn neg(self) -> ScalarGrid {
        let mut out = self.clone();
        for cell in &mut out.data {
            *cell = -*cell;
        }
        out.recalculate_extrema();
        out
    }
}

impl std::ops::MulAssign<f64> for ScalarGrid {
    fn mul_assign(&mut self, rhs: f64) {
        for cell in &mut self.data {
            *cell *= rhs;
        }
        self.recalculate_extrema();
    }
}

impl std::ops::Mul<f64> for &ScalarGrid {
    type Output = ScalarGrid;

    fn mul(self, rhs: f64) -> ScalarGrid {
        let mut out = self.clone();
        out *= rhs;
        out
    }
}

impl std::ops::DivAssign<f64> for ScalarGrid {
    // Division is multiplication by the reciprocal; dividing by zero gives
    // IEEE infinities/NaNs instead of an error.
    fn div_assign(&mut self, rhs: f64) {
        *self *= rhs.recip();
    }
}

impl std::ops::Div<f64> for &ScalarGrid {
    type Output = ScalarGrid;

    fn div(self, rhs: f64) -> ScalarGrid {
        self * rhs.recip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = ScalarGrid::new(4, 4);
        for (_, _, value) in grid.iter() {
            assert_eq!(value, 0.0);
        }
        assert_eq!(grid.minimum(), 0.0);
        assert_eq!(grid.maximum(), 0.0);
    }

    #[test]
    fn test_set_tracks_extrema() {
        let mut grid = ScalarGrid::new(4, 4);
        grid.set(1, 2, 5.0);
        grid.set(3, 0, -2.0);

        assert_eq!(grid.get(1, 2), 5.0);
        assert_eq!(grid.minimum(), -2.0);
        assert_eq!(grid.maximum(), 5.0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_get_panics() {
        let grid = ScalarGrid::new(4, 4);
        grid.get(4, 0);
    }

    #[test]
    fn test_fill_collapses_extrema() {
        let mut grid = ScalarGrid::new(3, 3);
        grid.set(0, 0, 9.0);
        grid.set(2, 2, -9.0);

        grid.fill(0.5);
        for (_, _, value) in grid.iter() {
            assert_eq!(value, 0.5);
        }
        assert_eq!(grid.minimum(), 0.5);
        assert_eq!(grid.maximum(), 0.5);
    }

    #[test]
    fn test_high_water_mark_and_rescan() {
        let mut grid = ScalarGrid::new(2, 2);
        grid.set(0, 0, 10.0);
        grid.set(0, 0, 1.0);

        // Incremental tracking never lowers the stale maximum.
        assert_eq!(grid.maximum(), 10.0);

        grid.recalculate_extrema();
        assert_eq!(grid.maximum(), 1.0);
        assert_eq!(grid.minimum(), 0.0);
    }

    #[test]
    fn test_rescan_matches_true_extrema() {
        let mut grid = ScalarGrid::new(3, 3);
        for (i, (x, y)) in (0..3).flat_map(|y| (0..3).map(move |x| (x, y))).enumerate() {
            grid.set(x, y, (i as f64) - 4.0);
        }
        grid.recalculate_extrema();

        let values: Vec<f64> = grid.iter().map(|(_, _, v)| v).collect();
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(grid.minimum(), min);
        assert_eq!(grid.maximum(), max);
    }

    #[test]
    fn test_elementwise_add_and_sub() {
        let mut a = ScalarGrid::new(2, 2);
        let mut b = ScalarGrid::new(2, 2);
        a.set(0, 0, 1.0);
        a.set(1, 1, 2.0);
        b.set(0, 0, 3.0);
        b.set(1, 0, -1.0);

        let sum = &a + &b;
        assert_eq!(sum.get(0, 0), 4.0);
        assert_eq!(sum.get(1, 0), -1.0);
        assert_eq!(sum.get(1, 1), 2.0);
        assert_eq!(sum.minimum(), -1.0);
        assert_eq!(sum.maximum(), 4.0);

        let diff = &sum - &b;
        for (x, y, value) in diff.iter() {
            assert!((value - a.get(x, y)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_negation_flips_extrema() {
        let mut grid = ScalarGrid::new(2, 2);
        grid.set(0, 0, 3.0);
        grid.set(1, 1, -1.0);

        let neg = -&grid;
        assert_eq!(neg.get(0, 0), -3.0);
        assert_eq!(neg.get(1, 1), 1.0);
        assert_eq!(neg.minimum(), -3.0);
        assert_eq!(neg.maximum(), 1.0);
    }

    #[test]
    fn test_scalar_mul_and_div() {
        let mut grid = ScalarGrid::new(2, 2);
        grid.set(0, 0, 2.0);
        grid.set(1, 0, -4.0);

        let scaled = &grid * 0.5;
        assert_eq!(scaled.get(0, 0), 1.0);
        assert_eq!(scaled.get(1, 0), -2.0);

        let divided = &grid / 2.0;
        assert_eq!(divided.get(0, 0), 1.0);
        assert_eq!(divided.get(1, 0), -2.0);
    }

    #[test]
    fn test_division_by_zero_gives_infinities() {
        let mut grid = ScalarGrid::new(2, 1);
        grid.set(0, 0, 1.0);
        grid.set(1, 0, -1.0);

        let divided = &grid / 0.0;
        assert_eq!(divided.get(0, 0), f64::INFINITY);
        assert_eq!(divided.get(1, 0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_sample_matches_get_at_integer_coords() {
        let mut grid = ScalarGrid::new(4, 4);
        for (i, (x, y)) in (0..4).flat_map(|y| (0..4).map(move |x| (x, y))).enumerate() {
            grid.set(x, y, i as f64 * 0.37);
        }

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.sample(x as f64, y as f64), grid.get(x, y));
            }
        }
    }

    #[test]
    fn test_sample_uses_inverse_corner_distance() {
        let mut grid = ScalarGrid::new(2, 2);
        grid.set(0, 0, 1.0);
        grid.set(1, 0, 2.0);
        grid.set(0, 1, 3.0);
        grid.set(1, 1, 4.0);

        let (x, y) = (0.25, 0.5);
        let corners = [(0usize, 0usize), (1, 0), (0, 1), (1, 1)];
        let mut expected = 0.0;
        let mut weight_sum = 0.0;
        for (cx, cy) in corners {
            let w = 1.0 / (x - cx as f64).hypot(y - cy as f64);
            expected += grid.get(cx, cy) * w;
            weight_sum += w;
        }
        expected /= weight_sum;

        assert!((grid.sample(x, y) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sample_midpoint_is_corner_average() {
        let mut grid = ScalarGrid::new(2, 2);
        grid.set(0, 0, 1.0);
        grid.set(1, 0, 2.0);
        grid.set(0, 1, 3.0);
        grid.set(1, 1, 4.0);

        // Equal corner distances collapse to the plain average.
        assert!((grid.sample(0.5, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_put_conserves_scattered_mass() {
        let mut grid = ScalarGrid::new(4, 4);
        grid.put(1.3, 2.6, 1.0);

        let total: f64 = grid.iter().map(|(_, _, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_put_at_integer_coords_hits_one_cell() {
        let mut grid = ScalarGrid::new(4, 4);
        grid.put(2.0, 1.0, 0.75);
        grid.put(2.0, 1.0, 0.25);

        assert_eq!(grid.get(2, 1), 1.0);
        let total: f64 = grid.iter().map(|(_, _, v)| v).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_put_then_sample_round_trip() {
        let mut grid = ScalarGrid::new(4, 4);
        let (x, y) = (1.5, 2.25);
        grid.put(x, y, 1.0);

        // The scatter spreads mass over 4 cells, so the gather at the same
        // point recovers a blend, not the full value.
        let read = grid.sample(x, y);
        assert!(read > 0.0 && read < 1.0, "read back {read}");
    }

    #[test]
    fn test_put_near_upper_edge_clamps() {
        let mut grid = ScalarGrid::new(4, 4);
        grid.put(3.5, 3.5, 1.0);

        let total: f64 = grid.iter().map(|(_, _, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-12);
        // All mass landed in the clamped corner cell.
        assert!((grid.get(3, 3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_is_unit_length_interior() {
        let mut grid = ScalarGrid::new(8, 8);
        for (i, (x, y)) in (0..8).flat_map(|y| (0..8).map(move |x| (x, y))).enumerate() {
            grid.set(x, y, ((i * 7) % 13) as f64 * 0.21);
        }

        for y in 1..7 {
            for x in 1..7 {
                let n = grid.normal_at(x, y, 1.0);
                assert!((n.length() - 1.0).abs() < 1e-9, "normal {n:?} at ({x},{y})");
            }
        }
    }

    #[test]
    fn test_normal_flat_grid_points_up() {
        let grid = ScalarGrid::new(4, 4);
        let n = grid.normal_at(2, 2, 1.0);
        assert!((n.x).abs() < 1e-12);
        assert!((n.y).abs() < 1e-12);
        assert!((n.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_tilts_against_slope() {
        let mut grid = ScalarGrid::new(4, 4);
        for (x, y) in (0..4).flat_map(|y| (0..4).map(move |x| (x, y))) {
            grid.set(x, y, x as f64);
        }

        // Height rises with +x, so the normal leans toward -x.
        let n = grid.normal_at(2, 2, 1.0);
        assert!(n.x < 0.0);
        assert!((n.y).abs() < 1e-12);
        assert!(n.z > 0.0);
    }

    #[test]
    fn test_normal_amplification_steepens_tilt() {
        let mut grid = ScalarGrid::new(4, 4);
        for (x, y) in (0..4).flat_map(|y| (0..4).map(move |x| (x, y))) {
            grid.set(x, y, x as f64 * 0.1);
        }

        let plain = grid.normal_at(2, 2, 1.0);
        let amplified = grid.normal_at(2, 2, 10.0);
        assert!(amplified.x.abs() > plain.x.abs());
    }

    #[test]
    fn test_normal_edge_uses_one_sided_difference() {
        let mut grid = ScalarGrid::new(4, 4);
        for (x, y) in (0..4).flat_map(|y| (0..4).map(move |x| (x, y))) {
            grid.set(x, y, x as f64);
        }

        // Same plane, so the edge normal matches the interior one even
        // though the x-span halves there.
        let edge = grid.normal_at(0, 2, 1.0);
        let interior = grid.normal_at(2, 2, 1.0);
        assert!((edge.x - interior.x).abs() < 1e-12);
        assert!((edge.z - interior.z).abs() < 1e-12);
    }

    #[test]
    fn test_normal_degenerate_grid_is_nan() {
        let grid = ScalarGrid::new(1, 1);
        let n = grid.normal_at(0, 0, 1.0);
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
    }
}
