use crate::error::GraphError;
use crate::graph::{EdgeId, EdgeState, NodeId, Traversal};

use geo::{LineString, Point};
use smallvec::SmallVec;

/// Adjacency of a single node. Most road junctions join four or fewer edges.
pub type Adjacency = SmallVec<[Traversal; 4]>;

/// Read contract of a road network.
///
/// Implementations are shared between concurrent matching calls,
/// and must therefore be safely readable from many threads.
pub trait RoadGraph: Sync {
    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn node_position(&self, node: NodeId) -> Result<Point, GraphError>;

    fn edge(&self, edge: EdgeId) -> Result<EdgeState, GraphError>;

    /// The full geometry of the edge, tower to tower, oriented
    /// from the edge's `base` node to its `adj` node.
    fn geometry(&self, edge: EdgeId) -> Result<LineString, GraphError>;

    /// Every traversal departing `node`, such that `traversal.from() == node`.
    ///
    /// Traversals the edge's access flags forbid are included; it is
    /// up to the weighting to exclude them.
    fn edges_of(&self, node: NodeId) -> Result<Adjacency, GraphError>;

    fn endpoints_of(&self, edge: EdgeId) -> Result<(NodeId, NodeId), GraphError> {
        self.edge(edge).map(|state| (state.base, state.adj))
    }

    fn length_of(&self, edge: EdgeId) -> Result<f64, GraphError> {
        self.edge(edge).map(|state| state.length)
    }

    fn access_allowed(&self, edge: EdgeId, reverse: bool) -> Result<bool, GraphError> {
        self.edge(edge).map(|state| state.access.allows(reverse))
    }

    /// The edge of the underlying network that `edge` was derived from.
    /// Identity for every edge of a real network.
    fn origin(&self, edge: EdgeId) -> EdgeId {
        edge
    }

    fn is_virtual_node(&self, _node: NodeId) -> bool {
        false
    }
}
