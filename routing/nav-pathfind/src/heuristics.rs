//! Move costs and the distance heuristic.
//!
//! Move costs count steps: a straight step costs exactly 1 whatever the cell
//! size. The distance heuristic is the straight-line world distance to the
//! goal.
//!
//! # Example
//!
//! ```
//! use nav_pathfind::heuristics::{distance_cost, move_cost};
//! use nav_spatial::VoxelCoord;
//! use nalgebra::Point3;
//!
//! assert!((move_cost(VoxelCoord::new(1, 0, 0), 0.4) - 1.0).abs() < 1e-12);
//! assert!((move_cost(VoxelCoord::new(1, 0, 1), 0.4) - 1.4).abs() < 1e-12);
//!
//! let h = distance_cost(&Point3::origin(), &Point3::new(0.0, 3.0, 4.0));
//! assert!((h - 5.0).abs() < 1e-12);
//! ```

use nalgebra::Point3;
use nav_spatial::VoxelCoord;

/// Cost of moving one step along `offset`.
///
/// A step that changes one axis costs 1. Each additional changing axis adds
/// `diagonal_penalty`: with the default of 0.4, an edge step costs 1.4 and a
/// corner step 1.8.
#[must_use]
pub fn move_cost(offset: VoxelCoord, diagonal_penalty: f64) -> f64 {
    let extra = offset.abs_sum().saturating_sub(1);
    diagonal_penalty.mul_add(f64::from(extra), 1.0)
}

/// Straight-line world distance between two points.
#[must_use]
pub fn distance_cost(from: &Point3<f64>, to: &Point3<f64>) -> f64 {
    nalgebra::distance(from, to)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_move_cost_face_adjacent() {
        for offset in VoxelCoord::moore_offsets()
            .into_iter()
            .filter(|o| o.is_axis_aligned())
        {
            assert_eq!(move_cost(offset, 0.4), 1.0);
        }
    }

    #[test]
    fn test_move_cost_edge_adjacent() {
        assert_relative_eq!(move_cost(VoxelCoord::new(1, -1, 0), 0.4), 1.4);
        assert_relative_eq!(move_cost(VoxelCoord::new(0, 1, 1), 0.4), 1.4);
    }

    #[test]
    fn test_move_cost_corner_adjacent() {
        assert_relative_eq!(move_cost(VoxelCoord::new(1, 1, -1), 0.4), 1.8);
    }

    #[test]
    fn test_zero_penalty_makes_every_step_unit() {
        for offset in VoxelCoord::moore_offsets() {
            assert_eq!(move_cost(offset, 0.0), 1.0);
        }
    }

    #[test]
    fn test_distance_is_world_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 0.0, 4.0);
        assert_relative_eq!(distance_cost(&a, &b), 5.0);
        assert_relative_eq!(distance_cost(&b, &a), 5.0);
        assert_eq!(distance_cost(&a, &a), 0.0);
    }
}
