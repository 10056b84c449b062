use crate::error::GraphError;
use crate::graph::geometry::cumulative;
use crate::graph::{Access, EdgeId, EdgeState, Graph, NodeId, SegmentEntry, Speed};

use geo::{Line, LineString, Point};
use log::debug;
use measure_time::debug_time;
use petgraph::graph::{NodeIndex, UnGraph};
use rstar::RTree;

/// Incrementally assembles a [`Graph`].
///
/// ```rust
/// use geo::point;
/// use routers_match::graph::{Access, GraphBuilder, Speed};
///
/// let mut builder = GraphBuilder::new();
/// let a = builder.add_node(point! { x: 0.0, y: 0.0 });
/// let b = builder.add_node(point! { x: 0.001, y: 0.0 });
/// builder.add_edge(a, b, &[], Access::ONE_WAY, Speed::default()).unwrap();
///
/// let graph = builder.build();
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    topology: UnGraph<NodeId, EdgeId>,
    positions: Vec<Point>,
    edges: Vec<EdgeState>,
    geometry: Vec<LineString>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Point) -> NodeId {
        let id = NodeId::from_index(self.positions.len());
        self.topology.add_node(id);
        self.positions.push(position);
        id
    }

    /// Joins `base` to `adj` with an edge passing through the given
    /// pillar (shape) points. The length of the edge is measured
    /// along the resulting geometry.
    pub fn add_edge(
        &mut self,
        base: NodeId,
        adj: NodeId,
        pillars: &[Point],
        access: Access,
        speed: Speed,
    ) -> Result<EdgeId, GraphError> {
        let id = EdgeId::from_index(self.edges.len());

        let position = |node: NodeId| {
            self.positions
                .get(node.index())
                .copied()
                .ok_or(GraphError::MissingNode(node))
        };

        let (start, end) = (position(base)?, position(adj)?);
        if base == adj {
            return Err(GraphError::DegenerateGeometry(id));
        }

        let geometry = std::iter::once(start)
            .chain(pillars.iter().copied())
            .chain(std::iter::once(end))
            .map(|point| point.0)
            .collect::<LineString>();

        let length = cumulative(&geometry).last().copied().unwrap_or_default();
        if !length.is_finite() {
            return Err(GraphError::DegenerateGeometry(id));
        }

        self.topology
            .add_edge(NodeIndex::new(base.index()), NodeIndex::new(adj.index()), id);
        self.edges.push(EdgeState {
            id,
            base,
            adj,
            length,
            access,
            speed,
        });
        self.geometry.push(geometry);

        Ok(id)
    }

    /// Shorthand for a straight, two-way edge at the default speed.
    pub fn add_road(&mut self, base: NodeId, adj: NodeId) -> Result<EdgeId, GraphError> {
        self.add_edge(base, adj, &[], Access::BOTH, Speed::default())
    }

    pub fn build(self) -> Graph {
        debug_time!("graph index construction");

        let segments = self
            .geometry
            .iter()
            .zip(&self.edges)
            .flat_map(|(line, edge)| {
                let offsets = cumulative(line);
                line.lines()
                    .zip(offsets)
                    .map(move |(segment, start_offset): (Line<f64>, f64)| SegmentEntry {
                        edge: edge.id,
                        line: segment,
                        start_offset,
                    })
            })
            .collect::<Vec<_>>();

        debug!(
            "Indexing {} segments across {} edges",
            segments.len(),
            self.edges.len()
        );

        Graph {
            topology: self.topology,
            positions: self.positions,
            edges: self.edges,
            geometry: self.geometry,
            index: RTree::bulk_load(segments),
        }
    }
}
