//! The navigation engine: lattice setup plus position-to-position queries.
//!
//! # Example
//!
//! ```
//! use nav_pathfind::NavEngine;
//! use nav_spatial::{Aabb, BoxObstacles, LatticeSpec};
//! use nav_types::{NavConfig, SearchConfig};
//! use nalgebra::{Point3, Vector3};
//!
//! // Ground slab with a wall across the middle, open at one end
//! let world = BoxObstacles::new(vec![
//!     Aabb::new(Point3::new(-5.0, -3.0, -5.0), Point3::new(5.0, -1.0, 5.0)),
//!     Aabb::new(Point3::new(-0.5, -1.0, -5.0), Point3::new(0.5, 3.0, 3.0)),
//! ]);
//!
//! let config = NavConfig::new(LatticeSpec::new(
//!     Point3::origin(),
//!     Vector3::new(10.0, 4.0, 10.0),
//!     1.0,
//! ))
//! .with_clearance_height(2.0);
//!
//! let mut engine = NavEngine::from_config(world, &config)?;
//! let route = engine.find_path(&Point3::new(-4.5, 0.0, -4.5), &Point3::new(4.5, 0.0, -4.5))?;
//!
//! // The route has to detour through the gap at the far end of the wall
//! assert!(route.path().positions().iter().any(|p| p.z > 2.0));
//! assert_eq!(engine.last_path(), Some(route.path()));
//! # Ok::<(), nav_types::NavError>(())
//! ```

use nalgebra::Point3;
use nav_spatial::{LatticeSpec, OccupancyOracle, VoxelLattice};
use nav_types::{NavConfig, NavError, NavPath, NavRoute, SearchConfig};
use tracing::{debug, warn};

use crate::search::PathSearch;

/// Owns a lattice built from an occupancy oracle and answers path queries
/// between world positions.
///
/// Setup is two calls, [`build_grid`](Self::build_grid) then
/// [`classify_walkability`](Self::classify_walkability), or one call to
/// [`from_config`](Self::from_config). Each query snaps its start and goal to
/// the closest walkable cells and runs a fresh [`PathSearch`].
#[derive(Debug)]
pub struct NavEngine<O> {
    oracle: O,
    config: SearchConfig,
    lattice: Option<VoxelLattice>,
    classified: bool,
    last_path: Option<NavPath>,
}

impl<O: OccupancyOracle> NavEngine<O> {
    /// Creates an engine with no lattice yet.
    #[must_use]
    pub const fn new(oracle: O, config: SearchConfig) -> Self {
        Self {
            oracle,
            config,
            lattice: None,
            classified: false,
            last_path: None,
        }
    }

    /// Creates an engine, builds its lattice and classifies walkability.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found; see
    /// [`NavConfig::validate`].
    pub fn from_config(oracle: O, config: &NavConfig) -> Result<Self, NavError> {
        config.validate()?;
        let mut engine = Self::new(oracle, config.search().clone());
        engine.build_grid(config.lattice())?;
        engine.classify_walkability(config.clearance_height())?;
        Ok(engine)
    }

    /// Builds (or rebuilds) the lattice, replacing any previous one.
    ///
    /// Walkability must be classified again afterwards. Returns the number of
    /// cells.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Spatial`] if the lattice description is invalid.
    /// The previous lattice is kept in that case.
    pub fn build_grid(&mut self, spec: &LatticeSpec) -> Result<usize, NavError> {
        let lattice = VoxelLattice::build(spec, &self.oracle)?;
        let cells = lattice.len();
        self.lattice = Some(lattice);
        self.classified = false;
        self.last_path = None;
        Ok(cells)
    }

    /// Classifies walkable floor cells. Returns how many there are.
    ///
    /// # Errors
    ///
    /// - [`NavError::GridNotBuilt`] if no lattice has been built
    /// - [`NavError::Spatial`] if the clearance height is invalid
    pub fn classify_walkability(&mut self, clearance_height: f64) -> Result<usize, NavError> {
        let lattice = self.lattice.as_mut().ok_or(NavError::GridNotBuilt)?;
        let walkable = lattice.classify_walkability(&self.oracle, clearance_height)?;
        self.classified = true;
        self.last_path = None;
        Ok(walkable)
    }

    /// Returns the index of the walkable cell closest to `position`.
    ///
    /// # Errors
    ///
    /// - [`NavError::GridNotBuilt`] or [`NavError::GridNotClassified`] before setup
    /// - [`NavError::NoWalkableCell`] if the lattice has no walkable cell or
    ///   `position` is not finite
    pub fn closest_walkable(&self, position: &Point3<f64>) -> Result<usize, NavError> {
        self.classified_lattice()?
            .closest_walkable(position)
            .ok_or_else(|| {
                warn!(?position, "No walkable cell for position");
                NavError::NoWalkableCell {
                    position: *position,
                }
            })
    }

    /// Starts a stepped search between two world positions.
    ///
    /// # Errors
    ///
    /// Returns setup errors and [`NavError::NoWalkableCell`]; see
    /// [`closest_walkable`](Self::closest_walkable).
    pub fn begin_search(
        &self,
        start: &Point3<f64>,
        goal: &Point3<f64>,
    ) -> Result<PathSearch<'_>, NavError> {
        let lattice = self.classified_lattice()?;
        let start_cell = self.closest_walkable(start)?;
        let goal_cell = self.closest_walkable(goal)?;
        debug!(start_cell, goal_cell, "Resolved query endpoints");
        PathSearch::new(lattice, &self.config, start_cell, goal_cell)
    }

    /// Finds a path between two world positions.
    ///
    /// The returned path runs between the walkable cells closest to `start`
    /// and `goal`. A successful path is kept for [`last_path`](Self::last_path);
    /// a failed query clears it.
    ///
    /// # Errors
    ///
    /// - setup errors, see [`closest_walkable`](Self::closest_walkable)
    /// - [`NavError::NoPathFound`] if the goal is unreachable
    /// - [`NavError::ExpansionLimit`] or [`NavError::Timeout`] if a resource
    ///   ceiling stopped the search
    pub fn find_path(
        &mut self,
        start: &Point3<f64>,
        goal: &Point3<f64>,
    ) -> Result<NavRoute, NavError> {
        let result = self.begin_search(start, goal).and_then(PathSearch::finish);
        self.last_path = result.as_ref().ok().map(|route| route.path().clone());
        result
    }

    /// Returns the lattice, if built.
    #[must_use]
    pub const fn lattice(&self) -> Option<&VoxelLattice> {
        self.lattice.as_ref()
    }

    /// Returns `true` once walkability has been classified on the current lattice.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        self.classified
    }

    /// Returns the path from the most recent successful query.
    #[must_use]
    pub const fn last_path(&self) -> Option<&NavPath> {
        self.last_path.as_ref()
    }

    /// Returns the search configuration.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the search configuration used by later queries.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidConfig`] if the configuration is invalid;
    /// the previous configuration is kept.
    pub fn set_config(&mut self, config: SearchConfig) -> Result<(), NavError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Returns the occupancy oracle.
    #[must_use]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    fn classified_lattice(&self) -> Result<&VoxelLattice, NavError> {
        let lattice = self.lattice.as_ref().ok_or(NavError::GridNotBuilt)?;
        if self.classified {
            Ok(lattice)
        } else {
            Err(NavError::GridNotClassified)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use nav_spatial::{Aabb, BoxObstacles, EmptySpace, SpatialError, VoxelCoord};

    fn ground() -> BoxObstacles {
        BoxObstacles::new(vec![Aabb::new(
            Point3::new(-2.5, -2.0, -2.5),
            Point3::new(2.5, -0.5, 2.5),
        )])
    }

    /// 5x2x5 volume, unit cells; the bottom layer sits at y = -0.5.
    fn spec() -> LatticeSpec {
        LatticeSpec::new(Point3::origin(), Vector3::new(5.0, 2.0, 5.0), 1.0)
    }

    fn ready_engine() -> NavEngine<BoxObstacles> {
        let config = NavConfig::new(spec()).with_clearance_height(1.0);
        NavEngine::from_config(ground(), &config).unwrap()
    }

    #[test]
    fn test_setup_order_is_enforced() {
        let mut engine = NavEngine::new(ground(), SearchConfig::default());
        let p = Point3::origin();

        assert_eq!(engine.closest_walkable(&p), Err(NavError::GridNotBuilt));
        assert_eq!(
            engine.classify_walkability(1.0),
            Err(NavError::GridNotBuilt)
        );

        assert_eq!(engine.build_grid(&spec()).unwrap(), 50);
        assert!(!engine.is_classified());
        assert!(matches!(
            engine.find_path(&p, &p),
            Err(NavError::GridNotClassified)
        ));

        assert_eq!(engine.classify_walkability(1.0).unwrap(), 25);
        assert!(engine.is_classified());
        assert!(engine.find_path(&p, &p).is_ok());
    }

    #[test]
    fn test_rebuild_requires_reclassify() {
        let mut engine = ready_engine();
        engine.build_grid(&spec()).unwrap();
        assert!(!engine.is_classified());
        assert!(engine.last_path().is_none());
    }

    #[test]
    fn test_bad_spec_keeps_previous_lattice() {
        let mut engine = ready_engine();
        let bad = LatticeSpec::new(Point3::origin(), Vector3::new(5.0, 2.0, 5.0), 0.0);

        assert_eq!(
            engine.build_grid(&bad),
            Err(NavError::Spatial(SpatialError::InvalidCellSize(0.0)))
        );
        assert_eq!(engine.lattice().unwrap().len(), 50);
        assert!(engine.is_classified());
    }

    #[test]
    fn test_endpoints_snap_to_floor() {
        let mut engine = ready_engine();
        let route = engine
            .find_path(&Point3::new(-2.2, 3.0, -1.9), &Point3::new(2.4, 0.7, 2.1))
            .unwrap();

        let lattice = engine.lattice().unwrap();
        let first = lattice.coord_of(route.path().first().unwrap().cell()).unwrap();
        let last = lattice.coord_of(route.path().last().unwrap().cell()).unwrap();
        assert_eq!(first, VoxelCoord::new(0, 0, 0));
        assert_eq!(last, VoxelCoord::new(4, 0, 4));
        assert_relative_eq!(route.total_cost(), 5.6, epsilon = 1e-9);
    }

    #[test]
    fn test_same_cell_query() {
        let mut engine = ready_engine();
        let route = engine
            .find_path(&Point3::new(0.1, 0.0, 0.1), &Point3::new(-0.1, 0.0, -0.1))
            .unwrap();
        assert_eq!(route.path().len(), 1);
        assert_eq!(route.total_cost(), 0.0);
    }

    #[test]
    fn test_no_walkable_cell() {
        let config = NavConfig::new(spec()).with_clearance_height(1.0);
        let mut engine = NavEngine::from_config(EmptySpace, &config).unwrap();

        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(
            engine.find_path(&p, &Point3::origin()),
            Err(NavError::NoWalkableCell { position: p })
        );
    }

    #[test]
    fn test_non_finite_positions_are_rejected() {
        let mut engine = ready_engine();
        let floor = Point3::new(2.0, 0.0, 2.0);
        engine.find_path(&Point3::origin(), &floor).unwrap();

        let nan = Point3::new(f64::NAN, 0.0, 0.0);
        let far = Point3::new(0.0, 0.0, f64::INFINITY);
        assert!(matches!(
            engine.closest_walkable(&nan),
            Err(NavError::NoWalkableCell { .. })
        ));
        assert!(matches!(
            engine.find_path(&nan, &floor),
            Err(NavError::NoWalkableCell { position }) if position.x.is_nan()
        ));
        assert!(engine.last_path().is_none());
        assert_eq!(
            engine.find_path(&floor, &far),
            Err(NavError::NoWalkableCell { position: far })
        );
        assert!(engine.begin_search(&far, &floor).is_err());
    }

    #[test]
    fn test_failed_query_clears_last_path() {
        let mut engine = ready_engine();
        engine
            .find_path(&Point3::new(-2.0, 0.0, -2.0), &Point3::new(2.0, 0.0, 2.0))
            .unwrap();
        assert!(engine.last_path().is_some());

        engine
            .set_config(SearchConfig::default().with_max_expansions(1))
            .unwrap();
        let err = engine
            .find_path(&Point3::new(-2.0, 0.0, -2.0), &Point3::new(2.0, 0.0, 2.0))
            .unwrap_err();
        assert!(err.is_resource_limit());
        assert!(engine.last_path().is_none());
    }

    #[test]
    fn test_set_config_validates() {
        let mut engine = ready_engine();
        assert!(
            engine
                .set_config(SearchConfig::default().with_max_step_cells(0.0))
                .is_err()
        );
        assert_eq!(engine.config(), &SearchConfig::default());
    }

    #[test]
    fn test_begin_search_borrows_lattice() {
        let engine = ready_engine();
        let search = engine
            .begin_search(&Point3::new(-2.0, 0.0, 0.0), &Point3::new(2.0, 0.0, 0.0))
            .unwrap();
        let route = search.finish().unwrap();
        assert_eq!(route.path().len(), 5);
        assert!(engine.last_path().is_none());
    }
}
