use crate::error::GraphError;
use crate::graph::geometry::cut;
use crate::graph::{Adjacency, EdgeId, EdgeState, NodeId, RoadGraph, Traversal};
use crate::snap::Snap;

use either::Either;
use geo::{LineString, Point};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Offsets are compared at nanometer-over-kilometer precision when
/// deciding whether two snaps split an edge at the same position.
const OFFSET_PRECISION: f64 = 1e9;

type SplitKey = (EdgeId, i64);

#[inline]
fn split_key(snap: &Snap) -> SplitKey {
    (snap.edge, (snap.offset * OFFSET_PRECISION).round() as i64)
}

/// The span of a base graph edge covered by an edge,
/// as fractions of the base edge's length from its base node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeOrigin {
    pub edge: EdgeId,
    pub from_offset: f64,
    pub to_offset: f64,
}

#[derive(Debug, Clone)]
struct VirtualEdge {
    state: EdgeState,
    origin: EdgeOrigin,
    geometry: LineString,
}

/// Virtual nodes and edges layered over a base graph for a single matching call.
///
/// Every edge holding an interior or pillar snap is hidden and replaced by a
/// chain of virtual edges running from its base node, through a virtual node
/// at each distinct split position in increasing offset, to its adj node.
/// The chain keeps the direction, access flags and speeds of the edge, and
/// shares its length out in proportion to the offsets.
pub struct QueryOverlay<'g, G: ?Sized> {
    base: &'g G,
    base_nodes: usize,
    base_edges: usize,

    positions: Vec<Point>,
    edges: Vec<VirtualEdge>,

    /// Virtual edges touching each virtual node
    adjacency: Vec<SmallVec<[EdgeId; 2]>>,
    /// Virtual edges touching each real node
    attached: FxHashMap<NodeId, SmallVec<[EdgeId; 2]>>,

    hidden: FxHashSet<EdgeId>,
    splits: FxHashMap<SplitKey, NodeId>,
}

impl<G: ?Sized> Debug for QueryOverlay<'_, G> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "QueryOverlay with virtual Nodes: {}, Edges: {}",
            self.positions.len(),
            self.edges.len()
        )
    }
}

impl<'g, G> QueryOverlay<'g, G>
where
    G: RoadGraph + ?Sized,
{
    /// An overlay without any virtual elements.
    pub fn new(base: &'g G) -> Self {
        Self {
            base,
            base_nodes: base.node_count(),
            base_edges: base.edge_count(),
            positions: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            attached: FxHashMap::default(),
            hidden: FxHashSet::default(),
            splits: FxHashMap::default(),
        }
    }

    /// Builds the overlay for a set of snaps, returning the routing
    /// node of each snap in order.
    ///
    /// Tower snaps route from their real node. Interior and pillar snaps
    /// route from a virtual node, shared by every snap onto the same
    /// position of the same edge.
    pub fn materialize(base: &'g G, snaps: &[Snap]) -> Result<(Self, Vec<NodeId>), GraphError> {
        let mut overlay = Self::new(base);
        let mut positions: BTreeMap<EdgeId, BTreeMap<i64, (f64, Point)>> = BTreeMap::new();

        for snap in snaps.iter().filter(|snap| !snap.is_tower()) {
            let (edge, key) = split_key(snap);
            positions
                .entry(edge)
                .or_default()
                .entry(key)
                .or_insert((snap.offset, snap.point));
        }

        for (edge, splits) in positions {
            overlay.split(edge, splits.into_values())?;
        }

        let nodes = snaps
            .iter()
            .map(|snap| overlay.locate(snap))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Materialized {overlay:?} for {} snaps", snaps.len());
        Ok((overlay, nodes))
    }

    /// The routing node of a snap materialized within this overlay.
    pub fn locate(&self, snap: &Snap) -> Result<NodeId, GraphError> {
        if snap.is_tower() {
            return match snap.closest_node {
                Some(node) => Ok(node),
                None => self
                    .base
                    .edge(snap.edge)
                    .map(|state| if snap.offset < 0.5 { state.base } else { state.adj }),
            };
        }

        self.splits
            .get(&split_key(snap))
            .copied()
            .ok_or(GraphError::MissingEdge(snap.edge))
    }

    fn split(
        &mut self,
        edge: EdgeId,
        splits: impl Iterator<Item = (f64, Point)>,
    ) -> Result<(), GraphError> {
        let state = self.base.edge(edge)?;
        let geometry = self.base.geometry(edge)?;

        let mut chain = vec![(state.base, 0.0)];
        for (offset, point) in splits {
            let node = NodeId::from_index(self.base_nodes + self.positions.len());
            self.positions.push(point);
            self.adjacency.push(SmallVec::new());
            self.splits.insert(
                (edge, (offset * OFFSET_PRECISION).round() as i64),
                node,
            );

            chain.push((node, offset));
        }
        chain.push((state.adj, 1.0));

        for pair in chain.windows(2) {
            let [(from, start), (to, end)] = pair else {
                continue;
            };

            let id = EdgeId::from_index(self.base_edges + self.edges.len());
            self.edges.push(VirtualEdge {
                state: EdgeState {
                    id,
                    base: *from,
                    adj: *to,
                    length: state.length * (end - start),
                    ..state
                },
                origin: EdgeOrigin {
                    edge,
                    from_offset: *start,
                    to_offset: *end,
                },
                geometry: cut(&geometry, *start, *end),
            });

            self.attach(*from, id);
            self.attach(*to, id);
        }

        self.hidden.insert(edge);
        Ok(())
    }

    fn attach(&mut self, node: NodeId, edge: EdgeId) {
        match self.virtual_index(node) {
            Some(index) => self.adjacency[index].push(edge),
            None => self.attached.entry(node).or_default().push(edge),
        }
    }

    #[inline]
    fn virtual_index(&self, node: NodeId) -> Option<usize> {
        node.index()
            .checked_sub(self.base_nodes)
            .filter(|index| *index < self.positions.len())
    }

    #[inline]
    fn virtual_edge(&self, edge: EdgeId) -> Option<&VirtualEdge> {
        edge.index()
            .checked_sub(self.base_edges)
            .and_then(|index| self.edges.get(index))
    }

    /// The span of the base graph edge which `edge` covers.
    pub fn resolve(&self, edge: EdgeId) -> Result<EdgeOrigin, GraphError> {
        if edge.index() < self.base_edges {
            return self.base.edge(edge).map(|state| EdgeOrigin {
                edge: state.id,
                from_offset: 0.0,
                to_offset: 1.0,
            });
        }

        self.virtual_edge(edge)
            .map(|virtual_edge| virtual_edge.origin)
            .ok_or(GraphError::MissingEdge(edge))
    }

    pub fn base(&self) -> &'g G {
        self.base
    }

    pub fn is_hidden(&self, edge: EdgeId) -> bool {
        self.hidden.contains(&edge)
    }

    pub fn virtual_node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn virtual_edge_count(&self) -> usize {
        self.edges.len()
    }

    fn departing(&self, edge: EdgeId, node: NodeId) -> Result<Traversal, GraphError> {
        let state = self.edge(edge)?;
        Traversal::departing(state, node).ok_or(GraphError::DisconnectedEdge { edge, node })
    }
}

impl<G> RoadGraph for QueryOverlay<'_, G>
where
    G: RoadGraph + ?Sized,
{
    fn node_count(&self) -> usize {
        self.base_nodes + self.positions.len()
    }

    fn edge_count(&self) -> usize {
        self.base_edges + self.edges.len()
    }

    fn node_position(&self, node: NodeId) -> Result<Point, GraphError> {
        if node.index() < self.base_nodes {
            return self.base.node_position(node);
        }

        self.virtual_index(node)
            .map(|index| self.positions[index])
            .ok_or(GraphError::MissingNode(node))
    }

    fn edge(&self, edge: EdgeId) -> Result<EdgeState, GraphError> {
        if edge.index() < self.base_edges {
            return self.base.edge(edge);
        }

        self.virtual_edge(edge)
            .map(|virtual_edge| virtual_edge.state)
            .ok_or(GraphError::MissingEdge(edge))
    }

    fn geometry(&self, edge: EdgeId) -> Result<LineString, GraphError> {
        if edge.index() < self.base_edges {
            return self.base.geometry(edge);
        }

        self.virtual_edge(edge)
            .map(|virtual_edge| virtual_edge.geometry.clone())
            .ok_or(GraphError::MissingEdge(edge))
    }

    fn edges_of(&self, node: NodeId) -> Result<Adjacency, GraphError> {
        if node.index() >= self.base_nodes {
            let index = self
                .virtual_index(node)
                .ok_or(GraphError::MissingNode(node))?;

            return self.adjacency[index]
                .iter()
                .map(|edge| self.departing(*edge, node))
                .collect();
        }

        let mut adjacency = self.base.edges_of(node)?;
        adjacency.retain(|traversal| !self.hidden.contains(&traversal.edge.id));

        let attached = match self.attached.get(&node) {
            Some(edges) => Either::Left(edges.iter()),
            None => Either::Right(std::iter::empty()),
        };

        for edge in attached {
            adjacency.push(self.departing(*edge, node)?);
        }

        Ok(adjacency)
    }

    fn origin(&self, edge: EdgeId) -> EdgeId {
        self.virtual_edge(edge)
            .map_or(edge, |virtual_edge| virtual_edge.origin.edge)
    }

    fn is_virtual_node(&self, node: NodeId) -> bool {
        node.index() >= self.base_nodes
    }
}
