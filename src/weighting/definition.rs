use crate::graph::{EdgeId, EdgeState, NodeId};

pub trait Weighting: Send + Sync {
    fn name(&self) -> &'static str;

    /// A lower bound on the cost of travelling `distance` meters over
    /// any edge. Used to translate a distance ceiling into a cost ceiling.
    fn min_weight(&self, distance: f64) -> f64;

    /// Whether the given direction of the edge may not be travelled.
    fn edge_blocked(&self, edge: &EdgeState, reverse: bool) -> bool {
        !edge.access.allows(reverse)
    }

    /// The cost of travelling the edge, assuming it is not blocked.
    fn traversal_cost(&self, edge: &EdgeState, reverse: bool) -> f64;

    /// The time taken to travel the edge, assuming it is not blocked.
    fn traversal_millis(&self, edge: &EdgeState, reverse: bool) -> i64;

    /// The cost of travelling the edge, infinite when the direction is blocked.
    fn edge_cost(&self, edge: &EdgeState, reverse: bool) -> f64 {
        if self.edge_blocked(edge, reverse) {
            return f64::INFINITY;
        }

        self.traversal_cost(edge, reverse)
    }

    /// The time taken to travel the edge, zero when the direction is blocked.
    fn edge_millis(&self, edge: &EdgeState, reverse: bool) -> i64 {
        if self.edge_blocked(edge, reverse) {
            return 0;
        }

        self.traversal_millis(edge, reverse)
    }

    /// The cost of turning from `in_edge` onto `out_edge` at `via`.
    /// An infinite cost marks a restricted turn.
    fn turn_cost(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> f64;

    fn turn_millis(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> i64;

    fn has_turn_costs(&self) -> bool;
}
