//! Walking a finished search back from the goal to the start.

use nav_spatial::SpatialError;
use nav_types::{CellCost, NavError, NavPath, PathWaypoint};

use crate::neighbors::NeighborSearch;

/// Rebuilds the path ending at the last finalized cell.
///
/// From the last cell in `closed`, repeatedly step to the finalized neighbor
/// with the lowest arrival cost, taking the first one in enumeration order on
/// ties. Only neighbors strictly cheaper than the current cell qualify, so the
/// walk always terminates; it ends at `start` or fails with
/// [`NavError::BrokenChain`].
///
/// The returned path runs from `start` to the last finalized cell.
///
/// # Errors
///
/// - [`NavError::BrokenChain`] if a cell has no cheaper finalized neighbor
/// - [`NavError::Spatial`] if a finalized cell lies outside the lattice
pub fn reconstruct<C, F>(
    neighbors: &NeighborSearch<'_>,
    start: usize,
    closed: &[usize],
    is_closed: C,
    cost: F,
) -> Result<NavPath, NavError>
where
    C: Fn(usize) -> bool,
    F: Fn(usize) -> Option<CellCost>,
{
    let lattice = neighbors.lattice();
    let waypoint = |cell: usize, arrival: f64| -> Result<PathWaypoint, NavError> {
        let position = lattice.position(cell).ok_or(SpatialError::IndexOutOfBounds {
            index: cell,
            len: lattice.len(),
        })?;
        Ok(PathWaypoint::new(cell, *position, arrival))
    };

    let Some(&last) = closed.last() else {
        return Ok(NavPath::default());
    };

    let mut cell = last;
    let mut arrival = cost(cell).map_or(0.0, |c| c.arrival);
    let mut reversed = vec![waypoint(cell, arrival)?];

    while cell != start {
        let mut best: Option<(usize, f64)> = None;
        for neighbor in neighbors.neighbors(cell) {
            if !is_closed(neighbor.index) {
                continue;
            }
            let Some(recorded) = cost(neighbor.index) else {
                continue;
            };
            if recorded.arrival < arrival && best.is_none_or(|(_, b)| recorded.arrival < b) {
                best = Some((neighbor.index, recorded.arrival));
            }
        }

        let (previous, previous_arrival) = best.ok_or(NavError::BrokenChain { cell })?;
        cell = previous;
        arrival = previous_arrival;
        reversed.push(waypoint(cell, arrival)?);
    }

    reversed.reverse();
    Ok(NavPath::new(reversed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use nav_spatial::{Cell, EmptySpace, LatticeDims, VoxelLattice};
    use std::collections::HashMap;

    /// 4x1x1 row of floor cells at x = 0..4.
    fn row() -> VoxelLattice {
        let dims = LatticeDims::new(4, 1, 1).unwrap();
        let cells = (0..4_i32)
            .map(|x| Cell::new(Point3::new(f64::from(x), 0.0, 0.0), true))
            .collect();
        let mut lattice = VoxelLattice::from_cells(dims, 1.0, cells).unwrap();
        lattice.classify_walkability(&EmptySpace, 0.0).unwrap();
        lattice
    }

    fn run(
        lattice: &VoxelLattice,
        start: usize,
        closed: &[usize],
        arrivals: &[(usize, f64)],
    ) -> Result<NavPath, NavError> {
        let costs: HashMap<usize, CellCost> = arrivals
            .iter()
            .map(|&(i, a)| (i, CellCost::new(a, 0.0)))
            .collect();
        let search = NeighborSearch::new(lattice);
        reconstruct(
            &search,
            start,
            closed,
            |i| closed.contains(&i),
            |i| costs.get(&i).copied(),
        )
    }

    #[test]
    fn test_walks_back_to_start() {
        let lattice = row();
        let path = run(
            &lattice,
            0,
            &[0, 1, 2, 3],
            &[(0, 0.0), (1, 1.0), (2, 2.0), (3, 3.0)],
        )
        .unwrap();

        assert_eq!(path.cells().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(path.total_cost(), 3.0);
        assert_eq!(path.positions()[3], Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_only_start_gives_single_waypoint() {
        let lattice = row();
        let path = run(&lattice, 2, &[2], &[(2, 0.0)]).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.first().unwrap().cell(), 2);
    }

    #[test]
    fn test_ignores_cells_that_were_never_finalized() {
        let lattice = row();
        // Cell 2 has a recorded cost but was never finalized
        let err = run(&lattice, 0, &[0, 3], &[(0, 0.0), (2, 2.0), (3, 3.0)]).unwrap_err();
        assert_eq!(err, NavError::BrokenChain { cell: 3 });
    }

    #[test]
    fn test_equal_cost_neighbor_is_not_a_predecessor() {
        let lattice = row();
        // Cell 1 costs as much as cell 2, so the walk cannot step back
        let err = run(&lattice, 0, &[0, 1, 2], &[(0, 0.0), (1, 2.0), (2, 2.0)]).unwrap_err();
        assert_eq!(err, NavError::BrokenChain { cell: 2 });
    }

    #[test]
    fn test_empty_closed_set() {
        let lattice = row();
        assert!(run(&lattice, 0, &[], &[]).unwrap().is_empty());
    }
}
