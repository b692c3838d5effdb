//! Best-first path search over walkable lattice cells.
//!
//! [`PathSearch`] is an explicit state machine. Each call to
//! [`step`](PathSearch::step) expands the most recently finalized cell and
//! then finalizes the open cell with the lowest `arrival + distance`. Callers
//! that want to spread a search over several frames, or draw it while it
//! runs, drive it step by step. Everyone else calls
//! [`finish`](PathSearch::finish).
//!
//! # Example
//!
//! ```
//! use nav_pathfind::search::{PathSearch, SearchProgress};
//! use nav_spatial::{EmptySpace, LatticeSpec, VoxelCoord, VoxelLattice};
//! use nav_types::SearchConfig;
//! use nalgebra::{Point3, Vector3};
//!
//! // A single solid layer: every cell is a floor
//! let spec = LatticeSpec::new(Point3::origin(), Vector3::new(5.0, 1.0, 5.0), 1.0);
//! let mut lattice = VoxelLattice::build(&spec, &|_: &Point3<f64>, _: &Vector3<f64>| true)?;
//! lattice.classify_walkability(&EmptySpace, 1.0)?;
//!
//! let start = lattice.index_of(VoxelCoord::new(0, 0, 0)).unwrap();
//! let goal = lattice.index_of(VoxelCoord::new(4, 0, 4)).unwrap();
//! let mut search = PathSearch::new(&lattice, &SearchConfig::default(), start, goal)?;
//!
//! while search.step() == SearchProgress::Running {
//!     assert!(search.closed().len() <= lattice.len());
//! }
//! assert_eq!(search.progress(), SearchProgress::Found);
//!
//! let route = search.finish()?;
//! assert_eq!(route.path().len(), 5);
//! assert!((route.total_cost() - 5.6).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use nav_spatial::{SpatialError, VoxelLattice};
use nav_types::{CellCost, NavError, NavPath, NavRoute, SearchConfig, SearchStats};
use tracing::{debug, info, warn};

use crate::heuristics::{distance_cost, move_cost};
use crate::neighbors::NeighborSearch;
use crate::reconstruct::reconstruct;

/// Where a [`PathSearch`] stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchProgress {
    /// More steps are needed.
    Running,
    /// The goal cell has been finalized.
    Found,
    /// The open set ran dry before the goal was reached.
    Exhausted,
    /// The configured expansion limit was hit.
    ExpansionLimit,
    /// The configured timeout elapsed.
    TimedOut,
}

impl SearchProgress {
    /// Returns `true` for every state except [`Running`](Self::Running).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns `true` if the goal was reached.
    #[must_use]
    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found)
    }
}

/// Open-set entry for the priority queue.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    /// `arrival + distance` when the entry was pushed.
    total: f64,
    /// Order in which the cell first entered the open set.
    seq: u64,
    /// Lattice index.
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Scratch record for a cell the search has reached.
#[derive(Debug, Clone, Copy)]
struct Discovered {
    cost: CellCost,
    seq: u64,
}

/// One path query over a classified lattice.
///
/// The search holds a shared borrow of the lattice for its whole life, so the
/// lattice cannot change between steps. All cost bookkeeping lives in the
/// search and is dropped with it.
#[derive(Debug)]
pub struct PathSearch<'a> {
    neighbors: NeighborSearch<'a>,
    diagonal_penalty: f64,
    max_expansions: Option<usize>,
    timeout: Option<Duration>,
    start: usize,
    goal: usize,
    goal_position: Point3<f64>,
    discovered: HashMap<usize, Discovered>,
    open: BinaryHeap<OpenEntry>,
    open_len: usize,
    closed: Vec<usize>,
    closed_set: HashSet<usize>,
    current: usize,
    next_seq: u64,
    expansions: usize,
    started: Instant,
    elapsed: Duration,
    progress: SearchProgress,
}

impl<'a> PathSearch<'a> {
    /// Prepares a search from `start` to `goal`, both lattice indices.
    ///
    /// The start cell is finalized immediately. When `start == goal` the
    /// search is already [`Found`](SearchProgress::Found).
    ///
    /// Both cells are expected to be walkable; the engine resolves positions
    /// to walkable cells before calling this.
    ///
    /// # Errors
    ///
    /// - [`NavError::InvalidConfig`] if the configuration is invalid
    /// - [`NavError::Spatial`] with [`SpatialError::IndexOutOfBounds`] if
    ///   either index lies outside the lattice
    pub fn new(
        lattice: &'a VoxelLattice,
        config: &SearchConfig,
        start: usize,
        goal: usize,
    ) -> Result<Self, NavError> {
        config.validate()?;
        let len = lattice.len();
        if start >= len {
            return Err(SpatialError::IndexOutOfBounds { index: start, len }.into());
        }
        let goal_position = *lattice
            .position(goal)
            .ok_or(SpatialError::IndexOutOfBounds { index: goal, len })?;

        let mut search = Self {
            neighbors: NeighborSearch::from_config(lattice, config),
            diagonal_penalty: config.diagonal_penalty(),
            max_expansions: config.max_expansions(),
            timeout: config.timeout(),
            start,
            goal,
            goal_position,
            discovered: HashMap::new(),
            open: BinaryHeap::new(),
            open_len: 0,
            closed: vec![start],
            closed_set: HashSet::new(),
            current: start,
            next_seq: 1,
            expansions: 0,
            started: Instant::now(),
            elapsed: Duration::ZERO,
            progress: SearchProgress::Running,
        };
        let distance = search.distance_to_goal(start);
        search.closed_set.insert(start);
        search.discovered.insert(
            start,
            Discovered {
                cost: CellCost::start(distance),
                seq: 0,
            },
        );

        debug!(start, goal, distance, "Starting path search");

        if start == goal {
            search.conclude(SearchProgress::Found);
        }
        Ok(search)
    }

    /// Advances the search by one expansion.
    ///
    /// Once a terminal state is reached, further calls return it unchanged.
    pub fn step(&mut self) -> SearchProgress {
        if self.progress.is_terminal() {
            return self.progress;
        }
        if self
            .timeout
            .is_some_and(|timeout| self.started.elapsed() >= timeout)
        {
            return self.conclude(SearchProgress::TimedOut);
        }
        if self
            .max_expansions
            .is_some_and(|limit| self.expansions >= limit)
        {
            return self.conclude(SearchProgress::ExpansionLimit);
        }

        self.expand(self.current);
        self.expansions += 1;

        let Some(next) = self.pop_open() else {
            return self.conclude(SearchProgress::Exhausted);
        };
        self.closed.push(next);
        self.closed_set.insert(next);
        self.current = next;

        if next == self.goal {
            self.conclude(SearchProgress::Found)
        } else {
            SearchProgress::Running
        }
    }

    /// Steps until a terminal state is reached and returns it.
    pub fn run(&mut self) -> SearchProgress {
        loop {
            let progress = self.step();
            if progress.is_terminal() {
                return progress;
            }
        }
    }

    /// Runs the search to completion and turns the outcome into a route.
    ///
    /// # Errors
    ///
    /// - [`NavError::NoPathFound`] if the goal is unreachable
    /// - [`NavError::ExpansionLimit`] or [`NavError::Timeout`] if a resource
    ///   ceiling stopped the search
    /// - [`NavError::BrokenChain`] if the path cannot be walked back
    pub fn finish(mut self) -> Result<NavRoute, NavError> {
        match self.run() {
            SearchProgress::Found => {
                let path = self.reconstruct()?;
                let stats = self.stats();
                info!(
                    expansions = stats.expansions(),
                    cells = path.len(),
                    cost = path.total_cost(),
                    "Path found"
                );
                Ok(NavRoute::new(path).with_stats(stats))
            }
            SearchProgress::ExpansionLimit => Err(NavError::ExpansionLimit {
                limit: self.max_expansions.unwrap_or(self.expansions),
                visited: self.closed,
            }),
            SearchProgress::TimedOut => Err(NavError::Timeout {
                elapsed: self.elapsed,
                visited: self.closed,
            }),
            // run() only returns terminal states
            SearchProgress::Exhausted | SearchProgress::Running => Err(NavError::NoPathFound {
                start: self.start,
                goal: self.goal,
                visited: self.closed,
            }),
        }
    }

    /// Walks back from the most recently finalized cell to the start.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::BrokenChain`] if some cell on the way has no
    /// finalized neighbor with a lower arrival cost.
    pub fn reconstruct(&self) -> Result<NavPath, NavError> {
        reconstruct(
            &self.neighbors,
            self.start,
            &self.closed,
            |index| self.is_closed(index),
            |index| self.cost(index),
        )
    }

    /// Start cell index.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Goal cell index.
    #[must_use]
    pub const fn goal(&self) -> usize {
        self.goal
    }

    /// Current state.
    #[must_use]
    pub const fn progress(&self) -> SearchProgress {
        self.progress
    }

    /// The most recently finalized cell.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Finalized cells in visitation order, starting with the start cell.
    #[must_use]
    pub fn closed(&self) -> &[usize] {
        &self.closed
    }

    /// Returns `true` if the cell has been finalized.
    #[must_use]
    pub fn is_closed(&self, index: usize) -> bool {
        self.closed_set.contains(&index)
    }

    /// Number of cells reached but not yet finalized.
    #[must_use]
    pub const fn open_len(&self) -> usize {
        self.open_len
    }

    /// Number of cells expanded so far.
    #[must_use]
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Costs recorded for a cell, if the search has reached it.
    #[must_use]
    pub fn cost(&self, index: usize) -> Option<CellCost> {
        self.discovered.get(&index).map(|d| d.cost)
    }

    /// Time spent so far, frozen once the search concludes.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        if self.progress.is_terminal() {
            self.elapsed
        } else {
            self.started.elapsed()
        }
    }

    /// Statistics for the search so far.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        SearchStats::new()
            .with_expansions(self.expansions)
            .with_open_set_size(self.open_len)
            .with_closed_set_size(self.closed.len())
            .with_elapsed(self.elapsed())
    }

    fn distance_to_goal(&self, index: usize) -> f64 {
        self.neighbors
            .lattice()
            .position(index)
            .map_or(0.0, |p| distance_cost(p, &self.goal_position))
    }

    fn expand(&mut self, index: usize) {
        let Some(arrival) = self.discovered.get(&index).map(|d| d.cost.arrival) else {
            return;
        };
        let lattice = self.neighbors.lattice();

        for neighbor in self.neighbors.neighbors(index) {
            if self.closed_set.contains(&neighbor.index) {
                continue;
            }
            let tentative = arrival + move_cost(neighbor.offset, self.diagonal_penalty);
            let seq = match self.discovered.get(&neighbor.index) {
                Some(known) if known.cost.arrival <= tentative => continue,
                Some(known) => known.seq,
                None => {
                    self.open_len += 1;
                    self.next_seq += 1;
                    self.next_seq - 1
                }
            };
            let distance = lattice
                .position(neighbor.index)
                .map_or(0.0, |p| distance_cost(p, &self.goal_position));
            let cost = CellCost::new(tentative, distance);
            self.discovered.insert(neighbor.index, Discovered { cost, seq });
            self.open.push(OpenEntry {
                total: cost.total(),
                seq,
                index: neighbor.index,
            });
        }
    }

    fn pop_open(&mut self) -> Option<usize> {
        while let Some(entry) = self.open.pop() {
            if self.closed_set.contains(&entry.index) {
                continue;
            }
            // Skip entries superseded by a cheaper re-queue
            let current_total = self.discovered.get(&entry.index).map(|d| d.cost.total());
            if current_total.is_none_or(|total| entry.total > total) {
                continue;
            }
            self.open_len = self.open_len.saturating_sub(1);
            return Some(entry.index);
        }
        None
    }

    fn conclude(&mut self, progress: SearchProgress) -> SearchProgress {
        self.progress = progress;
        self.elapsed = self.started.elapsed();
        match progress {
            SearchProgress::Found => debug!(
                expansions = self.expansions,
                visited = self.closed.len(),
                "Path search reached goal"
            ),
            SearchProgress::Exhausted => warn!(
                start = self.start,
                goal = self.goal,
                visited = self.closed.len(),
                "Path search exhausted without reaching goal"
            ),
            SearchProgress::ExpansionLimit | SearchProgress::TimedOut => warn!(
                ?progress,
                expansions = self.expansions,
                elapsed = ?self.elapsed,
                "Path search stopped by resource limit"
            ),
            SearchProgress::Running => {}
        }
        progress
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use nav_spatial::{Cell, EmptySpace, LatticeDims, LatticeSpec, VoxelCoord};

    /// Single-layer lattice where every cell is a floor.
    fn open_floor(nx: usize, nz: usize) -> VoxelLattice {
        #[allow(clippy::cast_precision_loss)]
        let extents = Vector3::new(nx as f64, 1.0, nz as f64);
        let spec = LatticeSpec::new(Point3::origin(), extents, 1.0);
        let mut lattice =
            VoxelLattice::build(&spec, &|_: &Point3<f64>, _: &Vector3<f64>| true).unwrap();
        lattice.classify_walkability(&EmptySpace, 1.0).unwrap();
        lattice
    }

    /// Single-layer lattice; cells where `floor` is false are holes.
    fn floor_with_holes(nx: usize, nz: usize, floor: impl Fn(i32, i32) -> bool) -> VoxelLattice {
        let dims = LatticeDims::new(nx, 1, nz).unwrap();
        let cells = (0..dims.len())
            .map(|i| {
                let c = dims.coord_of(i).unwrap();
                Cell::new(
                    Point3::new(f64::from(c.x), 0.0, f64::from(c.z)),
                    floor(c.x, c.z),
                )
            })
            .collect();
        let mut lattice = VoxelLattice::from_cells(dims, 1.0, cells).unwrap();
        lattice.classify_walkability(&EmptySpace, 1.0).unwrap();
        lattice
    }

    fn index(lattice: &VoxelLattice, x: i32, z: i32) -> usize {
        lattice.index_of(VoxelCoord::new(x, 0, z)).unwrap()
    }

    #[test]
    fn test_open_entry_is_min_heap_with_fifo_ties() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry {
            total: 3.0,
            seq: 0,
            index: 0,
        });
        heap.push(OpenEntry {
            total: 1.0,
            seq: 2,
            index: 1,
        });
        heap.push(OpenEntry {
            total: 1.0,
            seq: 1,
            index: 2,
        });
        heap.push(OpenEntry {
            total: 2.0,
            seq: 3,
            index: 3,
        });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_start_equals_goal() {
        let lattice = open_floor(3, 3);
        let start = index(&lattice, 1, 1);
        let search = PathSearch::new(&lattice, &SearchConfig::default(), start, start).unwrap();

        assert_eq!(search.progress(), SearchProgress::Found);
        assert_eq!(search.closed(), &[start]);

        let route = search.finish().unwrap();
        assert_eq!(route.path().len(), 1);
        assert_eq!(route.total_cost(), 0.0);
        assert_eq!(route.stats().expansions(), 0);
    }

    #[test]
    fn test_straight_line() {
        let lattice = open_floor(5, 1);
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 0);

        let route = PathSearch::new(&lattice, &SearchConfig::default(), start, goal)
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(route.path().cells().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_relative_eq!(route.total_cost(), 4.0);
    }

    #[test]
    fn test_diagonal_scenario() {
        let lattice = open_floor(5, 5);
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 4);

        let mut search = PathSearch::new(&lattice, &SearchConfig::default(), start, goal).unwrap();
        assert_eq!(search.run(), SearchProgress::Found);

        // Straight down the diagonal, nothing else finalized
        let diagonal: Vec<usize> = (0..5).map(|i| index(&lattice, i, i)).collect();
        assert_eq!(search.closed(), diagonal.as_slice());

        let route = search.finish().unwrap();
        assert_eq!(route.path().cells().collect::<Vec<_>>(), diagonal);
        assert_relative_eq!(route.total_cost(), 5.6, epsilon = 1e-9);
        for (i, waypoint) in route.path().iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = 1.4 * i as f64;
            assert_relative_eq!(waypoint.arrival_cost(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_distance_cost_is_world_distance() {
        // Half-width cells: 5x1x5 over a 2.5 x 0.5 x 2.5 volume
        let spec = LatticeSpec::new(Point3::origin(), Vector3::new(2.5, 0.5, 2.5), 0.5);
        let mut lattice =
            VoxelLattice::build(&spec, &|_: &Point3<f64>, _: &Vector3<f64>| true).unwrap();
        lattice.classify_walkability(&EmptySpace, 0.5).unwrap();
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 4);
        let goal_position = *lattice.position(goal).unwrap();

        let mut search = PathSearch::new(&lattice, &SearchConfig::default(), start, goal).unwrap();
        assert_relative_eq!(
            search.cost(start).unwrap().distance,
            8.0_f64.sqrt(),
            epsilon = 1e-9
        );

        search.step();
        for neighbor in [index(&lattice, 1, 0), index(&lattice, 0, 1), index(&lattice, 1, 1)] {
            let position = lattice.position(neighbor).unwrap();
            let cost = search.cost(neighbor).unwrap();
            assert_relative_eq!(
                cost.distance,
                nalgebra::distance(position, &goal_position),
                epsilon = 1e-12
            );
        }

        // Move costs still count steps, not world units
        let route = search.finish().unwrap();
        assert_eq!(route.path().len(), 5);
        assert_relative_eq!(route.total_cost(), 5.6, epsilon = 1e-9);
    }

    #[test]
    fn test_routes_around_hole() {
        // A wall of holes at x = 2 except at z = 4
        let lattice = floor_with_holes(5, 5, |x, z| x != 2 || z == 4);
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 0);

        let route = PathSearch::new(&lattice, &SearchConfig::default(), start, goal)
            .unwrap()
            .finish()
            .unwrap();
        assert!(route.path().cells().any(|c| c == index(&lattice, 2, 4)));
        assert!(route.path().len() > 5);
    }

    #[test]
    fn test_unreachable_goal() {
        // Goal island in the corner, ringed by holes
        let lattice = floor_with_holes(5, 5, |x, z| (x == 4 && z == 4) || (x < 3 && z < 3));
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 4);

        let mut search = PathSearch::new(&lattice, &SearchConfig::default(), start, goal).unwrap();
        assert_eq!(search.run(), SearchProgress::Exhausted);
        assert_eq!(search.closed().len(), 9);

        let err = search.finish().unwrap_err();
        assert!(err.is_no_path_found());
        let visited = err.visited().unwrap();
        assert_eq!(visited.len(), 9);
        assert_eq!(visited[0], start);
        assert!(!visited.contains(&goal));
    }

    #[test]
    fn test_expansion_limit() {
        let lattice = open_floor(8, 8);
        let config = SearchConfig::default().with_max_expansions(3);
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 7, 0);

        let err = PathSearch::new(&lattice, &config, start, goal)
            .unwrap()
            .finish()
            .unwrap_err();
        match err {
            NavError::ExpansionLimit { limit, visited } => {
                assert_eq!(limit, 3);
                assert_eq!(visited.len(), 4);
                assert_eq!(visited[0], start);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_timeout() {
        let lattice = open_floor(4, 4);
        let config = SearchConfig::default().with_timeout(Duration::ZERO);
        let mut search = PathSearch::new(&lattice, &config, 0, lattice.len() - 1).unwrap();

        assert_eq!(search.step(), SearchProgress::TimedOut);
        assert!(search.finish().unwrap_err().is_resource_limit());
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let lattice = open_floor(3, 1);
        let mut search = PathSearch::new(&lattice, &SearchConfig::default(), 0, 2).unwrap();
        assert_eq!(search.run(), SearchProgress::Found);
        let expansions = search.expansions();

        assert_eq!(search.step(), SearchProgress::Found);
        assert_eq!(search.expansions(), expansions);
    }

    #[test]
    fn test_observers_between_steps() {
        let lattice = open_floor(5, 5);
        let start = index(&lattice, 0, 0);
        let goal = index(&lattice, 4, 4);
        let mut search = PathSearch::new(&lattice, &SearchConfig::default(), start, goal).unwrap();

        assert_eq!(search.current(), start);
        assert_eq!(search.open_len(), 0);

        assert_eq!(search.step(), SearchProgress::Running);
        assert_eq!(search.expansions(), 1);
        assert_eq!(search.current(), index(&lattice, 1, 1));
        // Start had 3 neighbors, one was finalized
        assert_eq!(search.open_len(), 2);
        assert!(search.is_closed(start));
        assert_relative_eq!(search.cost(search.current()).unwrap().arrival, 1.4);
    }

    #[test]
    fn test_rejects_out_of_range_cells() {
        let lattice = open_floor(2, 2);
        let config = SearchConfig::default();

        let err = PathSearch::new(&lattice, &config, 4, 0).unwrap_err();
        assert_eq!(
            err,
            NavError::Spatial(SpatialError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert!(PathSearch::new(&lattice, &config, 0, 99).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let lattice = open_floor(2, 2);
        let config = SearchConfig::default().with_diagonal_penalty(-1.0);
        assert!(matches!(
            PathSearch::new(&lattice, &config, 0, 3),
            Err(NavError::InvalidConfig(_))
        ));
    }
}
