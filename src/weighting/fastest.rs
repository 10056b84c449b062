use crate::graph::{EdgeId, EdgeState, NodeId};
use crate::weighting::{NoTurnCost, TurnCostProvider, Weighting};

/// Speed cap (km/h) applied when none is configured.
pub const DEFAULT_MAX_SPEED: f64 = 140.0;

/// The cost of an edge is the seconds taken to travel it at its
/// directional speed, capped at `max_speed`. A direction with no
/// speed is blocked.
#[derive(Debug, Clone)]
pub struct FastestWeighting<T = NoTurnCost> {
    max_speed: f64,
    turn_costs: T,
}

impl Default for FastestWeighting {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED)
    }
}

impl FastestWeighting {
    pub fn new(max_speed: f64) -> Self {
        Self {
            max_speed,
            turn_costs: NoTurnCost,
        }
    }
}

impl<T> FastestWeighting<T>
where
    T: TurnCostProvider,
{
    pub fn with_turn_costs(max_speed: f64, turn_costs: T) -> Self {
        Self {
            max_speed,
            turn_costs,
        }
    }

    #[inline]
    fn speed(&self, edge: &EdgeState, reverse: bool) -> f64 {
        edge.speed.towards(reverse).min(self.max_speed)
    }
}

impl<T> Weighting for FastestWeighting<T>
where
    T: TurnCostProvider,
{
    fn name(&self) -> &'static str {
        "fastest"
    }

    #[inline]
    fn min_weight(&self, distance: f64) -> f64 {
        distance / (self.max_speed / 3.6)
    }

    fn edge_blocked(&self, edge: &EdgeState, reverse: bool) -> bool {
        !edge.access.allows(reverse) || !(self.speed(edge, reverse) > 0.0)
    }

    #[inline]
    fn traversal_cost(&self, edge: &EdgeState, reverse: bool) -> f64 {
        edge.length / (self.speed(edge, reverse) / 3.6)
    }

    #[inline]
    fn traversal_millis(&self, edge: &EdgeState, reverse: bool) -> i64 {
        (self.traversal_cost(edge, reverse) * 1000.0).round() as i64
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
