//! Neighbor enumeration over a classified lattice.
//!
//! # Example
//!
//! ```
//! use nav_pathfind::neighbors::NeighborSearch;
//! use nav_spatial::{Cell, EmptySpace, LatticeDims, VoxelCoord, VoxelLattice};
//! use nalgebra::Point3;
//!
//! // A flat 3x1x3 floor, everything solid
//! let dims = LatticeDims::new(3, 1, 3).unwrap();
//! let cells = (0..9_i32)
//!     .map(|i| Cell::new(Point3::new(f64::from(i % 3), 0.0, f64::from(i / 3)), true))
//!     .collect();
//! let mut lattice = VoxelLattice::from_cells(dims, 1.0, cells).unwrap();
//! lattice.classify_walkability(&EmptySpace, 1.0).unwrap();
//!
//! let search = NeighborSearch::new(&lattice);
//! let center = lattice.index_of(VoxelCoord::new(1, 0, 1)).unwrap();
//! assert_eq!(search.neighbors(center).count(), 8);
//! ```

use nav_spatial::{VoxelCoord, VoxelLattice};
use nav_types::{DEFAULT_MAX_STEP_CELLS, SearchConfig};

/// A cell adjacent to the one being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbor {
    /// Flat lattice index of the neighbor.
    pub index: usize,
    /// Direction from the expanded cell to the neighbor.
    pub offset: VoxelCoord,
}

/// Enumerates the walkable cells adjacent to a given cell.
///
/// Candidates are the 26 offsets of `{-1, 0, 1}³` minus the zero offset,
/// visited with x outermost and z innermost. The 8 corner offsets are skipped
/// unless corners are enabled. A candidate is admitted when it lies inside the
/// lattice, is walkable, and its center is within the step cutoff.
///
/// Admission is symmetric between walkable cells: if `b` is a neighbor of a
/// walkable `a`, then `a` is a neighbor of `b`.
#[derive(Debug, Clone)]
pub struct NeighborSearch<'a> {
    /// The classified lattice.
    lattice: &'a VoxelLattice,
    /// Candidate offsets in enumeration order.
    offsets: Vec<VoxelCoord>,
    /// Maximum distance between neighbor centers, in cell widths.
    max_step_cells: f64,
}

impl<'a> NeighborSearch<'a> {
    /// Creates a neighbor search with corners excluded and the default step
    /// cutoff.
    #[must_use]
    pub fn new(lattice: &'a VoxelLattice) -> Self {
        Self {
            lattice,
            offsets: candidate_offsets(false),
            max_step_cells: DEFAULT_MAX_STEP_CELLS,
        }
    }

    /// Creates a neighbor search using the connectivity settings of a search
    /// configuration.
    #[must_use]
    pub fn from_config(lattice: &'a VoxelLattice, config: &SearchConfig) -> Self {
        Self::new(lattice)
            .with_corners(config.allow_corners())
            .with_max_step_cells(config.max_step_cells())
    }

    /// Sets whether the corner offsets are candidates.
    #[must_use]
    pub fn with_corners(mut self, allow: bool) -> Self {
        self.offsets = candidate_offsets(allow);
        self
    }

    /// Sets the step cutoff, in cell widths.
    #[must_use]
    pub const fn with_max_step_cells(mut self, cells: f64) -> Self {
        self.max_step_cells = cells;
        self
    }

    /// Returns the lattice being searched.
    #[must_use]
    pub const fn lattice(&self) -> &'a VoxelLattice {
        self.lattice
    }

    /// Returns the candidate offsets in enumeration order.
    #[must_use]
    pub fn offsets(&self) -> &[VoxelCoord] {
        &self.offsets
    }

    /// Returns the number of candidate offsets: 18, or 26 with corners.
    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        self.offsets.len()
    }

    /// Returns the neighbor of `index` along `offset`, if it is admitted.
    #[must_use]
    pub fn admit(&self, index: usize, offset: VoxelCoord) -> Option<Neighbor> {
        let candidate = self.lattice.dims().offset(index, offset)?;
        if !self.lattice.is_walkable(candidate) {
            return None;
        }
        let distance = self.lattice.distance(index, candidate)?;
        (distance <= self.max_step_cells * self.lattice.cell_size()).then_some(Neighbor {
            index: candidate,
            offset,
        })
    }

    /// Returns an iterator over the admitted neighbors of `index`.
    ///
    /// Out-of-range indices have no neighbors.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = Neighbor> + '_ {
        self.offsets
            .iter()
            .filter_map(move |&offset| self.admit(index, offset))
    }
}

fn candidate_offsets(allow_corners: bool) -> Vec<VoxelCoord> {
    VoxelCoord::moore_offsets()
        .into_iter()
        .filter(|o| allow_corners || !o.is_corner())
        .collect()
}
