//! Configuration types for voxel navigation.
//!
//! # Example
//!
//! ```
//! use nav_types::{NavConfig, SearchConfig};
//! use nav_spatial::LatticeSpec;
//! use nalgebra::{Point3, Vector3};
//! use std::time::Duration;
//!
//! let search = SearchConfig::default()
//!     .with_corners(true)
//!     .with_max_expansions(50_000)
//!     .with_timeout(Duration::from_millis(20));
//!
//! let config = NavConfig::new(LatticeSpec::new(
//!     Point3::origin(),
//!     Vector3::new(32.0, 8.0, 32.0),
//!     0.5,
//! ))
//! .with_clearance_height(1.8)
//! .with_search(search);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use nav_spatial::LatticeSpec;

use crate::error::NavError;

/// Default extra cost per additional moving axis.
pub const DEFAULT_DIAGONAL_PENALTY: f64 = 0.4;

/// Default neighbor distance cutoff, in cell widths.
pub const DEFAULT_MAX_STEP_CELLS: f64 = 3.0;

/// Configuration for a single path search.
///
/// # Example
///
/// ```
/// use nav_types::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert!(!config.allow_corners());
/// assert!((config.diagonal_penalty() - 0.4).abs() < 1e-12);
/// assert!(config.max_expansions().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Whether the 8 corner offsets (all three axes moving) are neighbors.
    allow_corners: bool,
    /// Extra cost for each axis beyond the first in a move.
    diagonal_penalty: f64,
    /// Maximum distance between neighbor centers, in cell widths.
    max_step_cells: f64,
    /// Maximum number of cells to expand before giving up.
    max_expansions: Option<usize>,
    /// Maximum wall-clock time before giving up.
    timeout: Option<Duration>,
}

impl SearchConfig {
    /// Creates a search configuration with default settings.
    ///
    /// Defaults:
    /// - Corners: excluded (18-connectivity)
    /// - Diagonal penalty: 0.4
    /// - Max step: 3 cell widths
    /// - No expansion limit
    /// - No timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_corners: false,
            diagonal_penalty: DEFAULT_DIAGONAL_PENALTY,
            max_step_cells: DEFAULT_MAX_STEP_CELLS,
            max_expansions: None,
            timeout: None,
        }
    }

    /// Sets whether corner offsets are admitted as neighbors.
    ///
    /// - `true`: 26-connectivity
    /// - `false`: 18-connectivity (face and edge neighbors only)
    #[must_use]
    pub const fn with_corners(mut self, allow: bool) -> Self {
        self.allow_corners = allow;
        self
    }

    /// Sets the extra cost per additional moving axis.
    #[must_use]
    pub const fn with_diagonal_penalty(mut self, penalty: f64) -> Self {
        self.diagonal_penalty = penalty;
        self
    }

    /// Sets the neighbor distance cutoff, in cell widths.
    #[must_use]
    pub const fn with_max_step_cells(mut self, cells: f64) -> Self {
        self.max_step_cells = cells;
        self
    }

    /// Sets the maximum number of cells to expand.
    ///
    /// If this limit is reached, the search fails with
    /// [`NavError::ExpansionLimit`].
    #[must_use]
    pub const fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// Removes the expansion limit.
    #[must_use]
    pub const fn without_max_expansions(mut self) -> Self {
        self.max_expansions = None;
        self
    }

    /// Sets the search timeout.
    ///
    /// If this limit is reached, the search fails with [`NavError::Timeout`].
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the timeout.
    #[must_use]
    pub const fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Returns whether corner offsets are admitted.
    #[must_use]
    pub const fn allow_corners(&self) -> bool {
        self.allow_corners
    }

    /// Returns the diagonal penalty.
    #[must_use]
    pub const fn diagonal_penalty(&self) -> f64 {
        self.diagonal_penalty
    }

    /// Returns the neighbor distance cutoff, in cell widths.
    #[must_use]
    pub const fn max_step_cells(&self) -> f64 {
        self.max_step_cells
    }

    /// Returns the expansion limit.
    #[must_use]
    pub const fn max_expansions(&self) -> Option<usize> {
        self.max_expansions
    }

    /// Returns the timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidConfig`] if the diagonal penalty is negative
    /// or not finite, if the step cutoff is below one cell width or not
    /// finite, or if the expansion limit is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_types::SearchConfig;
    ///
    /// assert!(SearchConfig::default().validate().is_ok());
    /// assert!(SearchConfig::default().with_diagonal_penalty(-1.0).validate().is_err());
    /// assert!(SearchConfig::default().with_max_step_cells(0.5).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), NavError> {
        if !(self.diagonal_penalty.is_finite() && self.diagonal_penalty >= 0.0) {
            return Err(NavError::invalid_config(format!(
                "diagonal_penalty must be non-negative, got {}",
                self.diagonal_penalty
            )));
        }
        if !(self.max_step_cells.is_finite() && self.max_step_cells >= 1.0) {
            return Err(NavError::invalid_config(format!(
                "max_step_cells must be at least 1, got {}",
                self.max_step_cells
            )));
        }
        if self.max_expansions == Some(0) {
            return Err(NavError::invalid_config("max_expansions must be positive"));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to set up a navigation engine in one call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    /// Volume and resolution of the lattice.
    lattice: LatticeSpec,
    /// Free space required above a floor cell.
    clearance_height: f64,
    /// Per-query search settings.
    search: SearchConfig,
}

impl NavConfig {
    /// Creates a configuration for the given lattice, with zero clearance and
    /// default search settings.
    #[must_use]
    pub const fn new(lattice: LatticeSpec) -> Self {
        Self {
            lattice,
            clearance_height: 0.0,
            search: SearchConfig::new(),
        }
    }

    /// Sets the clearance height used for walkability classification.
    #[must_use]
    pub const fn with_clearance_height(mut self, height: f64) -> Self {
        self.clearance_height = height;
        self
    }

    /// Sets the search configuration.
    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Returns the lattice description.
    #[must_use]
    pub const fn lattice(&self) -> &LatticeSpec {
        &self.lattice
    }

    /// Returns the clearance height.
    #[must_use]
    pub const fn clearance_height(&self) -> f64 {
        self.clearance_height
    }

    /// Returns the search configuration.
    #[must_use]
    pub const fn search(&self) -> &SearchConfig {
        &self.search
    }

    /// Validates the lattice, clearance and search settings without building
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Spatial`] for lattice or clearance problems and
    /// [`NavError::InvalidConfig`] for search problems.
    pub fn validate(&self) -> Result<(), NavError> {
        self.lattice.dims()?;
        nav_spatial::scan_steps(self.clearance_height, self.lattice.cell_size())?;
        self.search.validate()
    }
}
