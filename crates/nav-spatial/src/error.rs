//! Error types for lattice construction and classification.

/// Errors that can occur while building or classifying a lattice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// The cell size must be positive and finite.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f64),

    /// Every axis of the volume must have a positive, finite extent.
    #[error("volume extents must be positive, got ({x}, {y}, {z})")]
    InvalidExtents {
        /// Extent along X.
        x: f64,
        /// Extent along Y.
        y: f64,
        /// Extent along Z.
        z: f64,
    },

    /// The volume center must be finite.
    #[error("volume origin must be finite, got ({x}, {y}, {z})")]
    InvalidOrigin {
        /// Origin X.
        x: f64,
        /// Origin Y.
        y: f64,
        /// Origin Z.
        z: f64,
    },

    /// The requested lattice has more cells than allowed.
    #[error("lattice would need {requested} cells, limit is {max}")]
    TooManyCells {
        /// Cells the volume would need (saturated at `usize::MAX`).
        requested: usize,
        /// Configured upper bound.
        max: usize,
    },

    /// The lattice dimensions are invalid or do not match the cell data.
    #[error("invalid lattice dimensions: {nx}x{ny}x{nz}")]
    InvalidDimensions {
        /// Cells along X.
        nx: usize,
        /// Cells along Y.
        ny: usize,
        /// Cells along Z.
        nz: usize,
    },

    /// The clearance height must be finite and non-negative.
    #[error("clearance height must be non-negative, got {0}")]
    InvalidClearance(f64),

    /// A cell index fell outside the lattice.
    #[error("cell index {index} is out of bounds for {len} cells")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of cells in the lattice.
        len: usize,
    },
}
