use crate::error::GraphError;
use crate::graph::{Adjacency, EdgeId, EdgeState, NodeId, RoadGraph, SegmentEntry, Traversal};

use geo::{LineString, Point};
use petgraph::graph::{NodeIndex, UnGraph};
use rstar::RTree;
use std::fmt::{Debug, Formatter};

/// In-memory road network, built using a [`GraphBuilder`](crate::graph::GraphBuilder).
///
/// Topology is held in an undirected petgraph structure whose node and
/// edge indices coincide with [`NodeId`] and [`EdgeId`], edge geometries
/// are held alongside, and every geometry segment is indexed in an R-Tree
/// for proximity queries (see [`Scan`](crate::snap::Scan)).
pub struct Graph {
    pub(crate) topology: UnGraph<NodeId, EdgeId>,
    pub(crate) positions: Vec<Point>,
    pub(crate) edges: Vec<EdgeState>,
    pub(crate) geometry: Vec<LineString>,
    pub(crate) index: RTree<SegmentEntry>,
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph with Nodes: {}, Edges: {}",
            self.positions.len(),
            self.edges.len()
        )
    }
}

impl Graph {
    pub fn index(&self) -> &RTree<SegmentEntry> {
        &self.index
    }
}

impl RoadGraph for Graph {
    #[inline]
    fn node_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    fn node_position(&self, node: NodeId) -> Result<Point, GraphError> {
        self.positions
            .get(node.index())
            .copied()
            .ok_or(GraphError::MissingNode(node))
    }

    #[inline]
    fn edge(&self, edge: EdgeId) -> Result<EdgeState, GraphError> {
        self.edges
            .get(edge.index())
            .copied()
            .ok_or(GraphError::MissingEdge(edge))
    }

    fn geometry(&self, edge: EdgeId) -> Result<LineString, GraphError> {
        self.geometry
            .get(edge.index())
            .cloned()
            .ok_or(GraphError::MissingEdge(edge))
    }

    fn edges_of(&self, node: NodeId) -> Result<Adjacency, GraphError> {
        if node.index() >= self.positions.len() {
            return Err(GraphError::MissingNode(node));
        }

        self.topology
            .edges(NodeIndex::new(node.index()))
            .map(|reference| {
                let state = self.edge(*reference.weight())?;
                Traversal::departing(state, node).ok_or(GraphError::DisconnectedEdge {
                    edge: state.id,
                    node,
                })
            })
            .collect()
    }
}
