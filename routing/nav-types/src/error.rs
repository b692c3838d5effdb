//! Error types for navigation queries.
//!
//! This module defines [`NavError`], which covers every way setting up the
//! engine or answering a path query can fail.

use std::time::Duration;

use nalgebra::Point3;
use nav_spatial::SpatialError;

/// Errors that can occur during engine setup or path search.
///
/// Search failures carry the cells finalized before the search stopped, in
/// visitation order, so callers can inspect or draw the explored region.
///
/// # Example
///
/// ```
/// use nav_types::NavError;
///
/// let error = NavError::NoPathFound {
///     start: 0,
///     goal: 24,
///     visited: vec![0, 1, 5],
/// };
///
/// assert!(error.to_string().contains("no path found"));
/// assert_eq!(error.visited(), Some(&[0, 1, 5][..]));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum NavError {
    /// The lattice or clearance settings are invalid.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A query was made before the lattice was built.
    #[error("lattice has not been built")]
    GridNotBuilt,

    /// A query was made before walkability was classified.
    #[error("lattice walkability has not been classified")]
    GridNotClassified,

    /// No walkable cell exists to stand in for the requested position.
    #[error("no walkable cell near {position}")]
    NoWalkableCell {
        /// The requested world position.
        position: Point3<f64>,
    },

    /// The search ran out of candidates before reaching the goal.
    ///
    /// The goal is not connected to the start through walkable cells.
    #[error("no path found from cell {start} to cell {goal}")]
    NoPathFound {
        /// Start cell index.
        start: usize,
        /// Goal cell index.
        goal: usize,
        /// Cells finalized before the search gave up.
        visited: Vec<usize>,
    },

    /// The search expanded more cells than allowed.
    #[error("search gave up after expanding {limit} cells")]
    ExpansionLimit {
        /// The configured expansion limit.
        limit: usize,
        /// Cells finalized before the search gave up.
        visited: Vec<usize>,
    },

    /// The search ran longer than allowed.
    #[error("search timed out after {elapsed:?}")]
    Timeout {
        /// Time spent before giving up.
        elapsed: Duration,
        /// Cells finalized before the search gave up.
        visited: Vec<usize>,
    },

    /// Path reconstruction found no cheaper finalized neighbor to step back to.
    #[error("path reconstruction stalled at cell {cell}")]
    BrokenChain {
        /// The cell with no predecessor.
        cell: usize,
    },

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NavError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_types::NavError;
    ///
    /// let error = NavError::invalid_config("max_expansions must be positive");
    /// assert!(error.to_string().contains("max_expansions"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a "no path found" error.
    #[must_use]
    pub const fn is_no_path_found(&self) -> bool {
        matches!(self, Self::NoPathFound { .. })
    }

    /// Returns `true` if the search hit its expansion limit or timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_types::NavError;
    /// use std::time::Duration;
    ///
    /// let error = NavError::Timeout {
    ///     elapsed: Duration::from_millis(5),
    ///     visited: Vec::new(),
    /// };
    /// assert!(error.is_resource_limit());
    /// assert!(!error.is_no_path_found());
    /// ```
    #[must_use]
    pub const fn is_resource_limit(&self) -> bool {
        matches!(self, Self::ExpansionLimit { .. } | Self::Timeout { .. })
    }

    /// Returns the cells finalized before a failed search stopped.
    #[must_use]
    pub fn visited(&self) -> Option<&[usize]> {
        match self {
            Self::NoPathFound { visited, .. }
            | Self::ExpansionLimit { visited, .. }
            | Self::Timeout { visited, .. } => Some(visited),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let error = NavError::NoWalkableCell {
            position: Point3::new(1.0, 2.0, 3.0),
        };
        assert!(error.to_string().contains("no walkable cell"));

        let error = NavError::ExpansionLimit {
            limit: 100,
            visited: vec![],
        };
        assert!(error.to_string().contains("100"));

        let error = NavError::Timeout {
            elapsed: Duration::from_millis(250),
            visited: vec![],
        };
        assert!(error.to_string().contains("timed out"));

        let error = NavError::BrokenChain { cell: 7 };
        assert!(error.to_string().contains("cell 7"));

        assert!(NavError::GridNotBuilt.to_string().contains("not been built"));
        assert!(
            NavError::GridNotClassified
                .to_string()
                .contains("not been classified")
        );
    }

    #[test]
    fn test_spatial_error_is_transparent() {
        let error: NavError = SpatialError::InvalidCellSize(0.0).into();
        assert_eq!(
            error.to_string(),
            SpatialError::InvalidCellSize(0.0).to_string()
        );
        assert!(matches!(error, NavError::Spatial(_)));
    }

    #[test]
    fn test_predicates() {
        let no_path = NavError::NoPathFound {
            start: 0,
            goal: 1,
            visited: vec![0],
        };
        assert!(no_path.is_no_path_found());
        assert!(!no_path.is_resource_limit());

        let limit = NavError::ExpansionLimit {
            limit: 3,
            visited: vec![0, 1, 2],
        };
        assert!(limit.is_resource_limit());
        assert_eq!(limit.visited().unwrap().len(), 3);

        assert_eq!(NavError::GridNotBuilt.visited(), None);
        assert!(!NavError::BrokenChain { cell: 0 }.is_no_path_found());
    }

    #[test]
    fn test_invalid_config_helper() {
        let error = NavError::invalid_config("test config error");
        assert!(matches!(error, NavError::InvalidConfig(msg) if msg == "test config error"));
    }
}
