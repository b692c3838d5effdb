//! Per-query cost bookkeeping.

/// Search costs recorded for one cell during one query.
///
/// `arrival` is the accumulated move cost from the start cell and `distance`
/// is the straight-line world distance to the goal. The search always expands the open cell with the lowest [`total`](Self::total).
///
/// # Example
///
/// ```
/// use nav_types::CellCost;
///
/// let cost = CellCost::new(2.4, 3.0);
/// assert!((cost.total() - 5.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCost {
    /// Cost accumulated from the start (cost-to-come).
    pub arrival: f64,
    /// Heuristic estimate to the goal (cost-to-go).
    pub distance: f64,
}

impl CellCost {
    /// Creates a cost record.
    #[must_use]
    pub const fn new(arrival: f64, distance: f64) -> Self {
        Self { arrival, distance }
    }

    /// Cost record for the start cell.
    #[must_use]
    pub const fn start(distance: f64) -> Self {
        Self::new(0.0, distance)
    }

    /// Priority key: `arrival + distance`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.arrival + self.distance
    }
}
