use crate::error::GraphError;
use crate::graph::{EdgeId, NodeId, RoadGraph, Traversal};
use crate::route::{Dijkstra, RouteCost};
use crate::weighting::Weighting;

use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A search label. Routes are searched edge-based, so that the turn
/// taken at each node is known, and may be costed or forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Label {
    node: NodeId,
    /// The edge, and its direction, by which the node was entered.
    via: Option<(EdgeId, bool)>,
}

/// The cheapest route found between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub cost: RouteCost,
    pub path: Vec<Traversal>,
}

impl Route {
    #[inline]
    pub fn weight(&self) -> f64 {
        self.cost.weight
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.cost.distance
    }

    #[inline]
    pub fn millis(&self) -> i64 {
        self.cost.millis
    }
}

/// Answers shortest-path queries between routing nodes of a graph.
///
/// Edges the weighting blocks are never travelled. Turn costs are
/// applied at real nodes, between the base edges of the turn, and
/// u-turns are forbidden at virtual nodes. Turns joining two routes at
/// a candidate are checked by [`TransitionOracle::permits_handoff`]. A search gives up once its
/// cost exceeds the given `max_explore` weight, reporting the targets
/// it has not reached as unreachable.
pub struct TransitionOracle<'a, G: ?Sized, W: ?Sized> {
    graph: &'a G,
    weighting: &'a W,
}

impl<'a, G, W> TransitionOracle<'a, G, W>
where
    G: RoadGraph + ?Sized,
    W: Weighting + ?Sized,
{
    pub fn new(graph: &'a G, weighting: &'a W) -> Self {
        Self { graph, weighting }
    }

    /// The cheapest route from `from` to `to`, or `None` if unreachable within `max_explore`.
    pub fn route_cost(
        &self,
        from: NodeId,
        to: NodeId,
        max_explore: f64,
    ) -> Result<Option<Route>, GraphError> {
        let mut routes = self.route_costs(from, &[to], max_explore)?;
        Ok(routes.pop().flatten())
    }

    /// The cheapest route from `from` to each of the `targets`, in order,
    /// from a single search.
    pub fn route_costs(
        &self,
        from: NodeId,
        targets: &[NodeId],
        max_explore: f64,
    ) -> Result<Vec<Option<Route>>, GraphError> {
        let mut routes: Vec<Option<Route>> = vec![None; targets.len()];
        let mut pending: FxHashMap<NodeId, SmallVec<[usize; 2]>> = FxHashMap::default();
        for (position, target) in targets.iter().enumerate() {
            pending.entry(*target).or_default().push(position);
        }

        let mut failure: Option<GraphError> = None;
        let start = Label {
            node: from,
            via: None,
        };

        let mut reachable = Dijkstra.reach(&start, |label: &Label| {
            self.successors(label)
                .unwrap_or_else(|error| {
                    failure.get_or_insert(error);
                    SmallVec::new()
                })
        });

        while !pending.is_empty() {
            let Some(item) = reachable.next() else {
                break;
            };

            if item.total_cost.weight > max_explore {
                break;
            }

            let Some(positions) = pending.remove(&item.node.node) else {
                continue;
            };

            let route = self.realise(reachable.path(item.index), item.total_cost)?;
            for position in positions {
                routes[position] = Some(route.clone());
            }
        }

        drop(reachable);
        if let Some(error) = failure {
            return Err(error);
        }

        trace!(
            "Routed {from} to {} of {} targets within {max_explore}",
            routes.iter().flatten().count(),
            targets.len()
        );

        Ok(routes)
    }

    /// Whether a route arriving at `via` by `arriving` may be continued
    /// by a route departing it by `departing`.
    ///
    /// Routes are searched independently between consecutive candidates,
    /// so the turn at the candidate joining them is checked here. Passing
    /// through a virtual node is always permitted. Reversing at one, or
    /// turning at a real node, is subject to the weighting's turn costs.
    pub fn permits_handoff(&self, arriving: EdgeId, via: NodeId, departing: EdgeId) -> bool {
        if !self.weighting.has_turn_costs() {
            return true;
        }

        if self.graph.is_virtual_node(via) && arriving != departing {
            return true;
        }

        self.turn(arriving, via, departing).0.is_finite()
    }

    /// The turn cost and time between the base edges of a turn.
    fn turn(&self, in_edge: EdgeId, via: NodeId, out_edge: EdgeId) -> (f64, i64) {
        let (in_edge, out_edge) = (self.graph.origin(in_edge), self.graph.origin(out_edge));

        (
            self.weighting.turn_cost(in_edge, via, out_edge),
            self.weighting.turn_millis(in_edge, via, out_edge),
        )
    }

    fn successors(&self, label: &Label) -> Result<SmallVec<[(Label, RouteCost); 4]>, GraphError> {
        let node = label.node;
        let mut successors = SmallVec::new();

        for traversal in self.graph.edges_of(node)? {
            let edge = &traversal.edge;
            if self.weighting.edge_blocked(edge, traversal.reverse) {
                continue;
            }

            let (mut turn_cost, mut turn_millis) = (0.0, 0);
            if let Some((in_edge, _)) = label.via {
                if self.graph.is_virtual_node(node) {
                    if in_edge == edge.id {
                        continue;
                    }
                } else if self.weighting.has_turn_costs() {
                    (turn_cost, turn_millis) = self.turn(in_edge, node, edge.id);
                    if !turn_cost.is_finite() {
                        continue;
                    }
                }
            }

            let cost = RouteCost::new(
                self.weighting.edge_cost(edge, traversal.reverse) + turn_cost,
                edge.length,
                self.weighting.edge_millis(edge, traversal.reverse) + turn_millis,
            );

            successors.push((
                Label {
                    node: traversal.to(),
                    via: Some((edge.id, traversal.reverse)),
                },
                cost,
            ));
        }

        Ok(successors)
    }

    fn realise(&self, labels: Vec<Label>, cost: RouteCost) -> Result<Route, GraphError> {
        let path = labels
            .into_iter()
            .filter_map(|label| label.via)
            .map(|(edge, reverse)| {
                self.graph
                    .edge(edge)
                    .map(|state| Traversal::new(state, reverse))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Route { cost, path })
    }
}
