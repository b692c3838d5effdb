//! Query results: a path plus search statistics.
//!
//! # Example
//!
//! ```
//! use nav_types::{NavPath, NavRoute, PathWaypoint, SearchStats};
//! use nalgebra::Point3;
//! use std::time::Duration;
//!
//! let path = NavPath::from_single(PathWaypoint::new(0, Point3::origin(), 0.0));
//! let route = NavRoute::new(path).with_stats(
//!     SearchStats::new()
//!         .with_expansions(1)
//!         .with_elapsed(Duration::from_micros(3)),
//! );
//! assert_eq!(route.stats().expansions(), 1);
//! ```

use std::time::Duration;

use crate::path::NavPath;

/// Statistics about one path search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Number of cells popped from the open set and finalized.
    expansions: usize,
    /// Number of cells still waiting in the open set at completion.
    open_set_size: usize,
    /// Number of finalized cells at completion.
    closed_set_size: usize,
    /// Time taken by the search.
    time_elapsed: Duration,
}

impl SearchStats {
    /// Creates empty statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expansions: 0,
            open_set_size: 0,
            closed_set_size: 0,
            time_elapsed: Duration::ZERO,
        }
    }

    /// Sets the number of expansions.
    #[must_use]
    pub const fn with_expansions(mut self, count: usize) -> Self {
        self.expansions = count;
        self
    }

    /// Sets the open set size at completion.
    #[must_use]
    pub const fn with_open_set_size(mut self, size: usize) -> Self {
        self.open_set_size = size;
        self
    }

    /// Sets the closed set size at completion.
    #[must_use]
    pub const fn with_closed_set_size(mut self, size: usize) -> Self {
        self.closed_set_size = size;
        self
    }

    /// Sets the time elapsed.
    #[must_use]
    pub const fn with_elapsed(mut self, duration: Duration) -> Self {
        self.time_elapsed = duration;
        self
    }

    /// Returns the number of expansions.
    #[must_use]
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Returns the open set size at completion.
    #[must_use]
    pub const fn open_set_size(&self) -> usize {
        self.open_set_size
    }

    /// Returns the closed set size at completion.
    #[must_use]
    pub const fn closed_set_size(&self) -> usize {
        self.closed_set_size
    }

    /// Returns the time taken by the search.
    #[must_use]
    pub const fn time_elapsed(&self) -> Duration {
        self.time_elapsed
    }
}

/// A successful query result.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavRoute {
    /// The path from start to goal.
    path: NavPath,
    /// Statistics about the search that produced it.
    stats: SearchStats,
}

impl NavRoute {
    /// Creates a route from a path, with empty statistics.
    #[must_use]
    pub const fn new(path: NavPath) -> Self {
        Self {
            path,
            stats: SearchStats::new(),
        }
    }

    /// Sets the search statistics.
    #[must_use]
    pub const fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Returns the path.
    #[must_use]
    pub const fn path(&self) -> &NavPath {
        &self.path
    }

    /// Returns the search statistics.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns the arrival cost at the goal.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.path.total_cost()
    }

    /// Consumes the route, returning the path.
    #[must_use]
    pub fn into_path(self) -> NavPath {
        self.path
    }
}
