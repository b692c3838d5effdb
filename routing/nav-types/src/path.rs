//! Paths through the lattice.
//!
//! A [`NavPath`] is the public result of a query: an ordered list of
//! [`PathWaypoint`]s from the start cell to the goal cell, both included.
//!
//! # Example
//!
//! ```
//! use nav_types::{NavPath, PathWaypoint};
//! use nalgebra::Point3;
//!
//! let path = NavPath::new(vec![
//!     PathWaypoint::new(0, Point3::new(0.0, 0.0, 0.0), 0.0),
//!     PathWaypoint::new(1, Point3::new(1.0, 0.0, 0.0), 1.0),
//!     PathWaypoint::new(7, Point3::new(2.0, 0.0, 1.0), 2.4),
//! ]);
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.cells().collect::<Vec<_>>(), vec![0, 1, 7]);
//! assert!((path.total_cost() - 2.4).abs() < 1e-12);
//! ```

use nalgebra::Point3;

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathWaypoint {
    /// Flat lattice index of the cell.
    cell: usize,
    /// World-space center of the cell.
    position: Point3<f64>,
    /// Arrival cost recorded by the search.
    arrival_cost: f64,
}

impl PathWaypoint {
    /// Creates a waypoint.
    #[must_use]
    pub const fn new(cell: usize, position: Point3<f64>, arrival_cost: f64) -> Self {
        Self {
            cell,
            position,
            arrival_cost,
        }
    }

    /// Returns the lattice index.
    #[must_use]
    pub const fn cell(&self) -> usize {
        self.cell
    }

    /// Returns the world position.
    #[must_use]
    pub const fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Returns the arrival cost at this waypoint.
    #[must_use]
    pub const fn arrival_cost(&self) -> f64 {
        self.arrival_cost
    }
}

/// An ordered path from start to goal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavPath {
    waypoints: Vec<PathWaypoint>,
}

impl NavPath {
    /// Creates a path from waypoints in start-to-goal order.
    #[must_use]
    pub const fn new(waypoints: Vec<PathWaypoint>) -> Self {
        Self { waypoints }
    }

    /// Creates a path that never leaves its start cell.
    #[must_use]
    pub fn from_single(waypoint: PathWaypoint) -> Self {
        Self::new(vec![waypoint])
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns the waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &[PathWaypoint] {
        &self.waypoints
    }

    /// Returns the start waypoint.
    #[must_use]
    pub fn first(&self) -> Option<&PathWaypoint> {
        self.waypoints.first()
    }

    /// Returns the goal waypoint.
    #[must_use]
    pub fn last(&self) -> Option<&PathWaypoint> {
        self.waypoints.last()
    }

    /// Returns an iterator over the waypoints.
    pub fn iter(&self) -> impl Iterator<Item = &PathWaypoint> {
        self.waypoints.iter()
    }

    /// Returns the lattice indices along the path.
    pub fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.waypoints.iter().map(PathWaypoint::cell)
    }

    /// Returns the world positions along the path, for whatever walks it.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.waypoints.iter().map(|w| w.position).collect()
    }

    /// Returns the arrival cost at the goal, or 0 for an empty path.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.last().map_or(0.0, PathWaypoint::arrival_cost)
    }

    /// Returns the summed world distance between consecutive waypoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|w| nalgebra::distance(&w[0].position, &w[1].position))
            .sum()
    }
}

impl IntoIterator for NavPath {
    type Item = PathWaypoint;
    type IntoIter = std::vec::IntoIter<PathWaypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.into_iter()
    }
}

impl<'a> IntoIterator for &'a NavPath {
    type Item = &'a PathWaypoint;
    type IntoIter = std::slice::Iter<'a, PathWaypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
