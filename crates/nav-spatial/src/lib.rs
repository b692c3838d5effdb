//! Voxel lattice and walkability classification for voxel navigation.
//!
//! This crate turns a bounded volume of world space into a dense lattice of
//! cells and decides which of them an agent can stand on:
//!
//! - [`VoxelLattice`] - Flat, row-major cell array built from a [`LatticeSpec`]
//! - [`LatticeDims`] - The single 3D-to-1D index convention, with per-axis bounds checks
//! - [`VoxelCoord`] - Integer lattice coordinates and neighbor offsets
//! - [`OccupancyOracle`] - The host's answer to "is this box blocked?"
//! - [`classify_walkability`] - Marks floor cells with enough headroom above them
//!
//! # Coordinate Systems
//!
//! **Y is up.** Lattice index `x + y * nx + z * nx * ny` addresses cell
//! `(x, y, z)`, and the walkability scan climbs in `+y`.
//!
//! World coordinates are continuous `f64` values (`nalgebra::Point3`). The
//! lattice is centered on the volume origin given in the [`LatticeSpec`].
//!
//! # Example
//!
//! ```
//! use nav_spatial::{Aabb, BoxObstacles, LatticeSpec, VoxelCoord, VoxelLattice};
//! use nalgebra::{Point3, Vector3};
//!
//! // Ground slab under a 6x4x6 volume
//! let ground = Aabb::new(Point3::new(-3.0, -3.0, -3.0), Point3::new(3.0, -1.0, 3.0));
//! let world = BoxObstacles::new(vec![ground]);
//!
//! let spec = LatticeSpec::new(Point3::origin(), Vector3::new(6.0, 4.0, 6.0), 1.0);
//! let mut lattice = VoxelLattice::build(&spec, &world)?;
//! lattice.classify_walkability(&world, 1.5)?;
//!
//! // The bottom layer is the floor
//! assert_eq!(lattice.walkable_count(), 36);
//! assert!(lattice.cell_at(VoxelCoord::new(2, 0, 3)).unwrap().is_walkable());
//!
//! // Nearest floor cell to a point in mid-air
//! let index = lattice.closest_walkable(&Point3::new(0.6, 1.0, 0.4)).unwrap();
//! assert_eq!(lattice.coord_of(index), Some(VoxelCoord::new(3, 0, 3)));
//! # Ok::<(), nav_spatial::SpatialError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod aabb;
mod classify;
mod error;
mod lattice;
mod occupancy;
mod voxel;

pub use aabb::Aabb;
pub use classify::{classify_walkability, scan_steps};
pub use error::SpatialError;
pub use lattice::{Cell, DEFAULT_MAX_CELLS, LatticeDims, LatticeSpec, VoxelLattice};
pub use occupancy::{BoxObstacles, EmptySpace, OccupancyOracle};
pub use voxel::VoxelCoord;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
