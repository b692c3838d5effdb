//! Core types for voxel navigation: configuration, costs, paths and errors.
//!
//! This crate holds the values that flow between the lattice
//! (`nav-spatial`) and the search (`nav-pathfind`):
//!
//! - **Configuration**: [`SearchConfig`] for one query, [`NavConfig`] for
//!   setting up a whole engine
//! - **Costs**: [`CellCost`], the per-query arrival and distance record
//! - **Results**: [`NavPath`] of [`PathWaypoint`]s, wrapped in a [`NavRoute`]
//!   with [`SearchStats`]
//! - **Errors**: [`NavError`]
//!
//! # Example
//!
//! ```
//! use nav_types::{NavConfig, SearchConfig};
//! use nav_spatial::LatticeSpec;
//! use nalgebra::{Point3, Vector3};
//!
//! let config = NavConfig::new(LatticeSpec::new(
//!     Point3::origin(),
//!     Vector3::new(10.0, 4.0, 10.0),
//!     1.0,
//! ))
//! .with_clearance_height(2.0)
//! .with_search(SearchConfig::default().with_max_expansions(10_000));
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![doc(html_root_url = "https://docs.rs/nav-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod cost;
pub mod error;
pub mod path;
pub mod route;

// Re-export main types at crate root for convenience
pub use config::{DEFAULT_DIAGONAL_PENALTY, DEFAULT_MAX_STEP_CELLS, NavConfig, SearchConfig};
pub use cost::CellCost;
pub use error::NavError;
pub use path::{NavPath, PathWaypoint};
pub use route::{NavRoute, SearchStats};
