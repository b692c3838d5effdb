//! Axis-aligned boxes used for occupancy queries.

use nalgebra::{Point3, Vector3};

/// An axis-aligned bounding box in world coordinates.
///
/// Occupancy queries are phrased as boxes centered on a cell, and
/// [`BoxObstacles`](crate::BoxObstacles) stores its geometry as boxes too.
///
/// # Example
///
/// ```
/// use nav_spatial::Aabb;
/// use nalgebra::{Point3, Vector3};
///
/// let cell = Aabb::from_center(Point3::new(0.5, 0.5, 0.5), Vector3::repeat(0.5));
/// let wall = Aabb::new(Point3::new(0.9, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
/// let neighbor = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
///
/// assert!(cell.overlaps(&wall));
/// // Touching faces share no volume
/// assert!(!cell.overlaps(&neighbor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner of the box.
    pub min: Point3<f64>,
    /// Maximum corner of the box.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a box from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates a box centered at a point with the given half-extents.
    ///
    /// Negative half-extents are treated as their absolute value.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the center point of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the half-extents of the box.
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        (self.max - self.min) * 0.5
    }

    /// Returns the full size of the box.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Checks if the two boxes share a region of positive volume.
    ///
    /// Boxes that only touch along a face, edge or corner do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}
