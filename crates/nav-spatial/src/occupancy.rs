//! Occupancy oracles: the boundary between the lattice and world geometry.
//!
//! The lattice never performs collision detection itself. Every "is this box
//! blocked?" question is routed through an [`OccupancyOracle`] supplied by the
//! host, which can wrap a physics engine, a voxelized mesh, or a plain list of
//! boxes.
//!
//! # Example
//!
//! ```
//! use nav_spatial::{Aabb, BoxObstacles, OccupancyOracle};
//! use nalgebra::{Point3, Vector3};
//!
//! let floor = Aabb::new(Point3::new(-5.0, -1.0, -5.0), Point3::new(5.0, 0.0, 5.0));
//! let world = BoxObstacles::new(vec![floor]);
//!
//! let half = Vector3::repeat(0.5);
//! assert!(world.is_occupied(&Point3::new(0.0, -0.5, 0.0), &half));
//! assert!(!world.is_occupied(&Point3::new(0.0, 0.5, 0.0), &half));
//! ```

use nalgebra::{Point3, Vector3};

use crate::aabb::Aabb;

/// Answers box-overlap queries against blocking world geometry.
///
/// Implementations must be deterministic for a fixed world state: the
/// lattice asks once per cell while building and once per scanned cell while
/// classifying floors, and expects the same answer for the same box.
pub trait OccupancyOracle {
    /// Returns `true` if the axis-aligned box centered at `center` with the
    /// given half-extents overlaps blocking geometry.
    fn is_occupied(&self, center: &Point3<f64>, half_extents: &Vector3<f64>) -> bool;
}

impl<F> OccupancyOracle for F
where
    F: Fn(&Point3<f64>, &Vector3<f64>) -> bool,
{
    fn is_occupied(&self, center: &Point3<f64>, half_extents: &Vector3<f64>) -> bool {
        self(center, half_extents)
    }
}

/// An oracle for a world with no geometry at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptySpace;

impl OccupancyOracle for EmptySpace {
    fn is_occupied(&self, _center: &Point3<f64>, _half_extents: &Vector3<f64>) -> bool {
        false
    }
}

/// Blocking geometry described as a list of axis-aligned boxes.
///
/// A query box is occupied when it shares positive volume with any obstacle,
/// so a cell that only touches an obstacle face stays free.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxObstacles {
    boxes: Vec<Aabb>,
}

impl BoxObstacles {
    /// Creates an oracle from a list of obstacle boxes.
    #[must_use]
    pub const fn new(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    /// Adds an obstacle box.
    pub fn push(&mut self, aabb: Aabb) {
        self.boxes.push(aabb);
    }

    /// Builder-style variant of [`push`](Self::push).
    #[must_use]
    pub fn with_box(mut self, aabb: Aabb) -> Self {
        self.boxes.push(aabb);
        self
    }

    /// Returns the obstacle boxes.
    #[must_use]
    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Returns the number of obstacle boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if there are no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl FromIterator<Aabb> for BoxObstacles {
    fn from_iter<I: IntoIterator<Item = Aabb>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl OccupancyOracle for BoxObstacles {
    fn is_occupied(&self, center: &Point3<f64>, half_extents: &Vector3<f64>) -> bool {
        let query = Aabb::from_center(*center, *half_extents);
        self.boxes.iter().any(|b| b.overlaps(&query))
    }
}
