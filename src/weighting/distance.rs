use crate::graph::{EdgeId, EdgeState, NodeId};
use crate::weighting::{NoTurnCost, TurnCostProvider, Weighting};

/// Nominal speed (km/h) used to derive travel times from distances.
const NOMINAL_SPEED: f64 = 60.0;

/// The cost of an edge is its length in meters. Travel
/// times assume a constant nominal speed of 60 km/h.
#[derive(Debug, Clone, Default)]
pub struct DistanceWeighting<T = NoTurnCost> {
    turn_costs: T,
}

impl DistanceWeighting {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> DistanceWeighting<T>
where
    T: TurnCostProvider,
{
    pub fn with_turn_costs(turn_costs: T) -> Self {
        Self { turn_costs }
    }
}

impl<T> Weighting for DistanceWeighting<T>
where
    T: TurnCostProvider,
{
    fn name(&self) -> &'static str {
        "distance"
    }

    #[inline]
    fn min_weight(&self, distance: f64) -> f64 {
        distance
    }

    #[inline]
    fn traversal_cost(&self, edge: &EdgeState, _reverse: bool) -> f64 {
        edge.length
    }

    #[inline]
    fn traversal_millis(&self, edge: &EdgeState, _reverse: bool) -> i64 {
        (edge.length * 3600.0 / NOMINAL_SPEED).round() as i64
    }

    fn turn_cost(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> f64 {
        self.turn_costs.turn_cost(in_edge, via, out_edge)
    }

    fn turn_millis(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> i64 {
        self.turn_costs.turn_millis(in_edge, via, out_edge)
    }

    fn has_turn_costs(&self) -> bool {
        self.turn_costs.is_active()
    }
}
