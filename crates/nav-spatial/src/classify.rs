//! Walkability classification.
//!
//! A cell is a floor when it sits on top of geometry: it is obstructed
//! itself, and a column of free cells rises above it for at least the
//! requested clearance height. Only floors are traversed by the path search.

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::error::SpatialError;
use crate::lattice::{VoxelLattice, ceil_count};
use crate::occupancy::OccupancyOracle;
use crate::voxel::VoxelCoord;

/// Number of cells scanned above a floor candidate for a given clearance.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidClearance`] if the clearance is negative or
/// not finite.
///
/// # Example
///
/// ```
/// use nav_spatial::scan_steps;
///
/// assert_eq!(scan_steps(0.0, 0.5).unwrap(), 0);
/// assert_eq!(scan_steps(1.0, 0.5).unwrap(), 2);
/// assert_eq!(scan_steps(1.2, 0.5).unwrap(), 3);
/// assert!(scan_steps(-1.0, 0.5).is_err());
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scan_steps(clearance_height: f64, cell_size: f64) -> Result<usize, SpatialError> {
    if !(clearance_height.is_finite() && clearance_height >= 0.0) {
        return Err(SpatialError::InvalidClearance(clearance_height));
    }
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(SpatialError::InvalidCellSize(cell_size));
    }
    let steps = ceil_count(clearance_height / cell_size);
    // Beyond i32 range every scan leaves the lattice anyway
    Ok(steps.min(f64::from(i32::MAX)) as usize)
}

/// Recomputes the walkable flag of every cell in the lattice.
///
/// All flags are cleared first, so calling this again with the same oracle
/// and clearance yields the same walkable set. Then, for every obstructed
/// cell, the oracle is asked about each cell directly above it, up to
/// `⌈clearance_height / cell_size⌉` steps. The cell becomes walkable when none
/// of those is occupied. A scan that runs off the top of the lattice counts as
/// free.
///
/// Returns the number of walkable cells.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidClearance`] if the clearance is negative or
/// not finite. The lattice is left untouched in that case.
pub fn classify_walkability<O>(
    lattice: &mut VoxelLattice,
    oracle: &O,
    clearance_height: f64,
) -> Result<usize, SpatialError>
where
    O: OccupancyOracle + ?Sized,
{
    let steps = scan_steps(clearance_height, lattice.cell_size())?;
    let dims = *lattice.dims();
    let half_extents = Vector3::repeat(lattice.cell_size() * 0.5);

    debug!(clearance_height, steps, "Classifying walkable cells");

    for cell in lattice.cells_mut() {
        cell.set_walkable(false);
    }

    let mut walkable = 0;
    for index in 0..lattice.len() {
        if !lattice.cells()[index].is_obstructed() {
            continue;
        }

        let mut clear = true;
        for step in 1..=steps {
            let Ok(dy) = i32::try_from(step) else {
                break;
            };
            let Some(above) = dims.offset(index, VoxelCoord::new(0, dy, 0)) else {
                // Ran off the top of the lattice
                break;
            };
            if oracle.is_occupied(lattice.cells()[above].position(), &half_extents) {
                clear = false;
                break;
            }
        }

        if clear {
            lattice.cells_mut()[index].set_walkable(true);
            walkable += 1;
        }
    }

    info!(walkable, cells = lattice.len(), "Classified walkable cells");

    Ok(walkable)
}

impl VoxelLattice {
    /// Recomputes walkability in place. See [`classify_walkability`].
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidClearance`] if the clearance is negative
    /// or not finite.
    pub fn classify_walkability<O>(
        &mut self,
        oracle: &O,
        clearance_height: f64,
    ) -> Result<usize, SpatialError>
    where
        O: OccupancyOracle + ?Sized,
    {
        classify_walkability(self, oracle, clearance_height)
    }
}
