use crate::graph::{EdgeId, NodeId};
use geo::Point;

/// Where along an edge a snapped position lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapPosition {
    /// Coincides with one of the edge's end nodes.
    Tower,
    /// Coincides with an interior vertex of the edge geometry.
    Pillar,
    /// Anywhere else along the edge.
    EdgeInterior,
}

/// The nearest position upon an edge to some point, as reported by a [`Scan`](crate::snap::Scan).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub edge: EdgeId,
    /// Distance (meters) along the edge geometry from its base node.
    pub offset: f64,
    /// Distance (meters) from the queried point.
    pub distance: f64,
    pub point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub edge: EdgeId,
    pub position: SnapPosition,

    /// Fraction `[0, 1]` of the edge's length from its base node.
    pub offset: f64,

    /// The snapped position upon the edge.
    pub point: Point,

    /// Distance (meters) from the queried point to the snapped position.
    pub distance: f64,

    /// The tower node snapped onto, for [`SnapPosition::Tower`].
    pub closest_node: Option<NodeId>,

    /// Index into the edge geometry of the vertex snapped onto, for [`SnapPosition::Pillar`].
    pub pillar: Option<usize>,
}

impl Snap {
    #[inline]
    pub fn is_tower(&self) -> bool {
        self.position == SnapPosition::Tower
    }
}
