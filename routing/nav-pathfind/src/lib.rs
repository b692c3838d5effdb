//! Path search over classified voxel floor lattices.
//!
//! This crate finds walkable routes through a [`nav_spatial::VoxelLattice`]
//! and packages them as `nav-types` values.
//!
//! # Overview
//!
//! - **Engine** ([`NavEngine`]): builds and classifies a lattice from an
//!   occupancy oracle, then answers queries between world positions
//! - **Search** ([`search::PathSearch`]): best-first search on
//!   `arrival + distance`, runnable to completion or one step at a time
//! - **Neighbors** ([`neighbors::NeighborSearch`]): 18- or 26-connected
//!   adjacency restricted to walkable cells
//! - **Reconstruction** ([`reconstruct::reconstruct`]): walks finalized cells
//!   back from the goal along strictly decreasing arrival cost
//!
//! # Quick Start
//!
//! ```
//! use nav_pathfind::NavEngine;
//! use nav_spatial::{Aabb, BoxObstacles, LatticeSpec};
//! use nav_types::SearchConfig;
//! use nalgebra::{Point3, Vector3};
//!
//! let ground = Aabb::new(Point3::new(-4.0, -2.0, -4.0), Point3::new(4.0, -0.5, 4.0));
//! let mut engine = NavEngine::new(BoxObstacles::new(vec![ground]), SearchConfig::default());
//!
//! engine.build_grid(&LatticeSpec::new(
//!     Point3::origin(),
//!     Vector3::new(8.0, 2.0, 8.0),
//!     1.0,
//! ))?;
//! engine.classify_walkability(1.0)?;
//!
//! let route = engine.find_path(&Point3::new(-3.5, 0.0, -3.5), &Point3::new(3.5, 0.0, 0.5))?;
//! for position in route.path().positions() {
//!     // Hand these to whatever walks the path
//!     assert!((position.y + 0.5).abs() < 1e-9);
//! }
//! # Ok::<(), nav_types::NavError>(())
//! ```
//!
//! # Costs
//!
//! A step along one axis costs 1. Every additional axis the step moves along
//! adds the configured diagonal penalty (0.4 by default). The distance
//! estimate is the straight-line world distance to the goal.

#![doc(html_root_url = "https://docs.rs/nav-pathfind/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod engine;
pub mod heuristics;
pub mod neighbors;
pub mod reconstruct;
pub mod search;

// Re-export main types for convenience
pub use engine::NavEngine;
pub use heuristics::{distance_cost, move_cost};
pub use neighbors::{Neighbor, NeighborSearch};
pub use search::{PathSearch, SearchProgress};
