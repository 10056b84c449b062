use crate::graph::EdgeId;

use geo::{Line, Point};
use rstar::{RTreeObject, AABB};

/// A single straight segment of an edge geometry, as held in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentEntry {
    pub edge: EdgeId,
    pub line: Line<f64>,
    /// Distance (meters) along the edge at which this segment starts.
    pub start_offset: f64,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<Point<f64>>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.line.start_point(), self.line.end_point())
    }
}
