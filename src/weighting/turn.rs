use crate::graph::{EdgeId, NodeId};
use rustc_hash::FxHashMap;

pub trait TurnCostProvider: Send + Sync {
    fn turn_cost(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> f64;

    fn turn_millis(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> i64;

    /// Whether this provider can ever yield a non-zero turn cost.
    fn is_active(&self) -> bool {
        true
    }
}

/// Every turn is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTurnCost;

impl TurnCostProvider for NoTurnCost {
    #[inline]
    fn turn_cost(&self, _: EdgeId, _: NodeId, _: EdgeId) -> f64 {
        0.0
    }

    #[inline]
    fn turn_millis(&self, _: EdgeId, _: NodeId, _: EdgeId) -> i64 {
        0
    }

    fn is_active(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TurnEntry {
    cost: f64,
    millis: i64,
}

/// Explicit per-turn costs and restrictions, keyed by `(in, via, out)`.
///
/// Turns absent from the table are free, except for u-turns (`in == out`),
/// which take the table's u-turn cost if one was given.
#[derive(Debug, Clone, Default)]
pub struct TurnCostTable {
    entries: FxHashMap<(EdgeId, NodeId, EdgeId), TurnEntry>,
    u_turn: Option<TurnEntry>,
}

impl TurnCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost(
        mut self,
        in_edge: EdgeId,
        via: NodeId,
        out_edge: EdgeId,
        cost: f64,
        millis: i64,
    ) -> Self {
        self.entries
            .insert((in_edge, via, out_edge), TurnEntry { cost, millis });
        self
    }

    /// Forbids turning from `in_edge` onto `out_edge` at `via`.
    pub fn restrict(self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> Self {
        self.with_cost(in_edge, via, out_edge, f64::INFINITY, 0)
    }

    /// Applies to every u-turn without an explicit entry.
    /// An infinite cost forbids u-turns altogether.
    pub fn with_u_turn_cost(mut self, cost: f64, millis: i64) -> Self {
        self.u_turn = Some(TurnEntry { cost, millis });
        self
    }

    fn lookup(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> Option<TurnEntry> {
        self.entries
            .get(&(in_edge, via, out_edge))
            .copied()
            .or_else(|| self.u_turn.filter(|_| in_edge == out_edge))
    }
}

impl TurnCostProvider for TurnCostTable {
    fn turn_cost(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> f64 {
        self.lookup(in_edge, via, out_edge)
            .map_or(0.0, |entry| entry.cost)
    }

    fn turn_millis(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> i64 {
        self.lookup(in_edge, via, out_edge)
            .map_or(0, |entry| entry.millis)
    }

    fn is_active(&self) -> bool {
        !self.entries.is_empty() || self.u_turn.is_some()
    }
}
