//! Dense voxel lattice and the grid builder.
//!
//! A [`VoxelLattice`] discretizes a bounded, axis-aligned volume into a
//! regular grid of [`Cell`]s stored in one flat array. Every lookup goes
//! through [`LatticeDims`], which owns the single index convention:
//!
//! ```text
//! index = x + y * nx + z * nx * ny
//! ```
//!
//! Y is the vertical axis, so "one cell up" is always a stride of `nx`.

// Cell counts are bounded by `max_cells` well below f64's exact integer range
#![allow(clippy::cast_precision_loss)]

use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::aabb::Aabb;
use crate::error::SpatialError;
use crate::occupancy::OccupancyOracle;
use crate::voxel::VoxelCoord;

/// Default upper bound on the number of cells a lattice may hold.
pub const DEFAULT_MAX_CELLS: usize = 1 << 24;

/// Relative slack applied before rounding cell counts up, so that
/// `0.3 / 0.1` yields 3 cells instead of 4.
const CEIL_TOLERANCE: f64 = 1e-9;

/// Rounds a positive ratio up to a whole count, ignoring float round-off.
pub(crate) fn ceil_count(ratio: f64) -> f64 {
    (ratio - CEIL_TOLERANCE).ceil().max(0.0)
}

/// Describes the volume a lattice covers and how finely it is divided.
///
/// # Example
///
/// ```
/// use nav_spatial::LatticeSpec;
/// use nalgebra::{Point3, Vector3};
///
/// let spec = LatticeSpec::new(Point3::origin(), Vector3::new(5.0, 1.0, 5.0), 1.0);
/// let dims = spec.dims().unwrap();
/// assert_eq!((dims.nx(), dims.ny(), dims.nz()), (5, 1, 5));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeSpec {
    /// Center of the volume in world space.
    origin: Point3<f64>,
    /// Full size of the volume along each axis.
    extents: Vector3<f64>,
    /// Edge length of one cube-shaped cell.
    cell_size: f64,
    /// Upper bound on the total number of cells.
    max_cells: usize,
}

impl LatticeSpec {
    /// Creates a lattice description.
    #[must_use]
    pub const fn new(origin: Point3<f64>, extents: Vector3<f64>, cell_size: f64) -> Self {
        Self {
            origin,
            extents,
            cell_size,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    /// Sets the maximum number of cells the lattice may hold.
    #[must_use]
    pub const fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Returns the volume center.
    #[must_use]
    pub const fn origin(&self) -> &Point3<f64> {
        &self.origin
    }

    /// Returns the volume extents.
    #[must_use]
    pub const fn extents(&self) -> &Vector3<f64> {
        &self.extents
    }

    /// Returns the cell edge length.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the cell-count limit.
    #[must_use]
    pub const fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Validates the description and computes the per-axis cell counts,
    /// `⌈extent / cell_size⌉` on each axis.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidCellSize`] if the cell size is not positive and finite
    /// - [`SpatialError::InvalidExtents`] if any extent is not positive and finite
    /// - [`SpatialError::InvalidOrigin`] if the origin is not finite
    /// - [`SpatialError::TooManyCells`] if the lattice would exceed `max_cells`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn dims(&self) -> Result<LatticeDims, SpatialError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(self.cell_size));
        }
        if self.extents.iter().any(|e| !(e.is_finite() && *e > 0.0)) {
            return Err(SpatialError::InvalidExtents {
                x: self.extents.x,
                y: self.extents.y,
                z: self.extents.z,
            });
        }
        if self.origin.iter().any(|c| !c.is_finite()) {
            return Err(SpatialError::InvalidOrigin {
                x: self.origin.x,
                y: self.origin.y,
                z: self.origin.z,
            });
        }

        let counts = self.extents.map(|e| ceil_count(e / self.cell_size).max(1.0));
        let requested = counts.x * counts.y * counts.z;
        if requested > self.max_cells as f64 {
            return Err(SpatialError::TooManyCells {
                requested: if requested >= usize::MAX as f64 {
                    usize::MAX
                } else {
                    requested as usize
                },
                max: self.max_cells,
            });
        }

        // Each count is at most `max_cells`, so the casts are exact
        LatticeDims::new(counts.x as usize, counts.y as usize, counts.z as usize)
    }
}

/// Per-axis cell counts and the index convention derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeDims {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl LatticeDims {
    /// Creates lattice dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] if any axis is empty or
    /// too long to address with `i32` coordinates, and
    /// [`SpatialError::TooManyCells`] if the total count overflows `usize`.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self, SpatialError> {
        let axis_max = usize::try_from(i32::MAX).unwrap_or(usize::MAX);
        if [nx, ny, nz].iter().any(|&n| n == 0 || n > axis_max) {
            return Err(SpatialError::InvalidDimensions { nx, ny, nz });
        }
        nx.checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .ok_or(SpatialError::TooManyCells {
                requested: usize::MAX,
                max: usize::MAX,
            })?;
        Ok(Self { nx, ny, nz })
    }

    /// Cells along X.
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along Y (vertical).
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// Cells along Z.
    #[must_use]
    pub const fn nz(&self) -> usize {
        self.nz
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Always `false`; every axis holds at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Index distance between a cell and the one directly above it.
    #[must_use]
    pub const fn stride_y(&self) -> usize {
        self.nx
    }

    /// Index distance between a cell and the next one along Z.
    #[must_use]
    pub const fn stride_z(&self) -> usize {
        self.nx * self.ny
    }

    /// Returns `true` if the coordinate lies inside the lattice.
    #[must_use]
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        Self::axis(coord.x, self.nx).is_some()
            && Self::axis(coord.y, self.ny).is_some()
            && Self::axis(coord.z, self.nz).is_some()
    }

    fn axis(value: i32, len: usize) -> Option<usize> {
        usize::try_from(value).ok().filter(|&v| v < len)
    }

    /// Converts a lattice coordinate to a flat index.
    ///
    /// ```
    /// use nav_spatial::{LatticeDims, VoxelCoord};
    ///
    /// let dims = LatticeDims::new(4, 3, 2).unwrap();
    /// assert_eq!(dims.index_of(VoxelCoord::new(1, 2, 1)), Some(1 + 2 * 4 + 12));
    /// assert_eq!(dims.index_of(VoxelCoord::new(4, 0, 0)), None);
    /// ```
    #[must_use]
    pub fn index_of(&self, coord: VoxelCoord) -> Option<usize> {
        let x = Self::axis(coord.x, self.nx)?;
        let y = Self::axis(coord.y, self.ny)?;
        let z = Self::axis(coord.z, self.nz)?;
        Some(x + y * self.stride_y() + z * self.stride_z())
    }

    /// Converts a flat index back to its lattice coordinate.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<VoxelCoord> {
        if index >= self.len() {
            return None;
        }
        let x = index % self.nx;
        let y = (index / self.nx) % self.ny;
        let z = index / self.stride_z();
        Some(VoxelCoord::new(
            i32::try_from(x).ok()?,
            i32::try_from(y).ok()?,
            i32::try_from(z).ok()?,
        ))
    }

    /// Returns the index of the cell at `offset` from `index`.
    ///
    /// The offset is applied per axis, so stepping off one face of the lattice
    /// never wraps around onto the opposite face.
    #[must_use]
    pub fn offset(&self, index: usize, offset: VoxelCoord) -> Option<usize> {
        let coord = self.coord_of(index)?.checked_add(offset)?;
        self.index_of(coord)
    }
}

/// One point of the lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    position: Point3<f64>,
    obstructed: bool,
    walkable: bool,
}

impl Cell {
    /// Creates a cell. New cells are never walkable until classified.
    #[must_use]
    pub const fn new(position: Point3<f64>, obstructed: bool) -> Self {
        Self {
            position,
            obstructed,
            walkable: false,
        }
    }

    /// World-space center of the cell.
    #[must_use]
    pub const fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Whether the cell overlaps blocking geometry.
    #[must_use]
    pub const fn is_obstructed(&self) -> bool {
        self.obstructed
    }

    /// Whether the cell is a floor surface the search may traverse.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    pub(crate) const fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }
}

/// A dense, flat-indexed lattice of cells covering a bounded volume.
///
/// # Example
///
/// ```
/// use nav_spatial::{Aabb, BoxObstacles, LatticeSpec, VoxelLattice};
/// use nalgebra::{Point3, Vector3};
///
/// // A slab filling the bottom layer of a 4x3x4 volume
/// let slab = Aabb::new(Point3::new(-2.0, -1.5, -2.0), Point3::new(2.0, -0.5, 2.0));
/// let world = BoxObstacles::new(vec![slab]);
///
/// let spec = LatticeSpec::new(Point3::origin(), Vector3::new(4.0, 3.0, 4.0), 1.0);
/// let mut lattice = VoxelLattice::build(&spec, &world).unwrap();
/// assert_eq!(lattice.len(), 48);
/// assert_eq!(lattice.obstructed_count(), 16);
///
/// let floors = lattice.classify_walkability(&world, 2.0).unwrap();
/// assert_eq!(floors, 16);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelLattice {
    dims: LatticeDims,
    cell_size: f64,
    cells: Vec<Cell>,
}

impl VoxelLattice {
    /// Builds a lattice over the described volume, asking the oracle once per
    /// cell whether a box of the cell's size is blocked.
    ///
    /// Cell centers sit at `origin + (i - (n - 1) / 2) * cell_size` on each
    /// axis, so the lattice is centered on the volume origin.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`LatticeSpec::dims`]; the oracle is not called
    /// when the description is rejected.
    pub fn build<O>(spec: &LatticeSpec, oracle: &O) -> Result<Self, SpatialError>
    where
        O: OccupancyOracle + ?Sized,
    {
        let dims = spec.dims()?;
        let cell_size = spec.cell_size();
        let half_extents = Vector3::repeat(cell_size * 0.5);
        let first = spec.origin()
            - Vector3::new(
                (dims.nx() - 1) as f64,
                (dims.ny() - 1) as f64,
                (dims.nz() - 1) as f64,
            ) * (cell_size * 0.5);

        debug!(
            nx = dims.nx(),
            ny = dims.ny(),
            nz = dims.nz(),
            cell_size,
            "Building voxel lattice"
        );

        let mut cells = Vec::with_capacity(dims.len());
        for z in 0..dims.nz() {
            for y in 0..dims.ny() {
                for x in 0..dims.nx() {
                    let position =
                        first + Vector3::new(x as f64, y as f64, z as f64) * cell_size;
                    let obstructed = oracle.is_occupied(&position, &half_extents);
                    cells.push(Cell::new(position, obstructed));
                }
            }
        }

        let lattice = Self {
            dims,
            cell_size,
            cells,
        };

        info!(
            cells = lattice.len(),
            obstructed = lattice.obstructed_count(),
            "Built voxel lattice"
        );

        Ok(lattice)
    }

    /// Assembles a lattice from precomputed cells in index order.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::InvalidCellSize`] if the cell size is not positive and finite
    /// - [`SpatialError::InvalidDimensions`] if `cells.len()` does not match `dims`
    pub fn from_cells(
        dims: LatticeDims,
        cell_size: f64,
        cells: Vec<Cell>,
    ) -> Result<Self, SpatialError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        if cells.len() != dims.len() {
            return Err(SpatialError::InvalidDimensions {
                nx: dims.nx(),
                ny: dims.ny(),
                nz: dims.nz(),
            });
        }
        Ok(Self {
            dims,
            cell_size,
            cells,
        })
    }

    /// Returns the lattice dimensions.
    #[must_use]
    pub const fn dims(&self) -> &LatticeDims {
        &self.dims
    }

    /// Returns the cell edge length.
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the lattice holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Returns the cell at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Returns the cell at a lattice coordinate.
    #[must_use]
    pub fn cell_at(&self, coord: VoxelCoord) -> Option<&Cell> {
        self.cells.get(self.dims.index_of(coord)?)
    }

    /// Converts a lattice coordinate to a flat index.
    #[must_use]
    pub fn index_of(&self, coord: VoxelCoord) -> Option<usize> {
        self.dims.index_of(coord)
    }

    /// Converts a flat index to a lattice coordinate.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<VoxelCoord> {
        self.dims.coord_of(index)
    }

    /// World-space center of the cell at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.cells.get(index).map(Cell::position)
    }

    /// Returns `true` if the cell at `index` exists and is walkable.
    #[must_use]
    pub fn is_walkable(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(Cell::is_walkable)
    }

    /// Straight-line world distance between two cell centers.
    #[must_use]
    pub fn distance(&self, a: usize, b: usize) -> Option<f64> {
        Some(nalgebra::distance(self.position(a)?, self.position(b)?))
    }

    /// Number of obstructed cells.
    #[must_use]
    pub fn obstructed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstructed()).count()
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_walkable()).count()
    }

    /// Indices of all walkable cells, ascending.
    pub fn walkable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_walkable())
            .map(|(i, _)| i)
    }

    /// Finds the walkable cell whose center is closest to `point`.
    ///
    /// Returns `None` when the lattice has no walkable cell or `point` is not
    /// finite. Among equally distant cells the lowest index wins.
    #[must_use]
    pub fn closest_walkable(&self, point: &Point3<f64>) -> Option<usize> {
        if point.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for index in self.walkable_indices() {
            let d = nalgebra::distance_squared(point, &self.cells[index].position);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((index, d));
            }
        }
        best.map(|(index, _)| index)
    }

    /// World-space box covered by the whole lattice.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let half = Vector3::repeat(self.cell_size * 0.5);
        match (self.cells.first(), self.cells.last()) {
            (Some(first), Some(last)) => {
                Aabb::new(first.position - half, last.position + half)
            }
            _ => Aabb::default(),
        }
    }
}
