use crate::config::DEFAULT_MAX_CANDIDATES;
use crate::error::GraphError;
use crate::graph::geometry::cumulative;
use crate::graph::{NodeId, RoadGraph};
use crate::snap::{Proximity, Scan, Snap, SnapPosition};

use geo::{Distance, Haversine, Point};
use itertools::Itertools;
use log::trace;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Positions closer than this (meters) along an edge are considered coincident.
pub const SNAP_EPSILON: f64 = 0.1;

/// A distance (meters) at the resolution of [`SNAP_EPSILON`]. Positions
/// equidistant up to rounding error share the same rank.
#[inline]
pub fn distance_rank(distance: f64) -> i64 {
    (distance / SNAP_EPSILON).round() as i64
}

/// Resolves the candidate snaps of a point upon the road network.
pub struct Snapper<'a, G: ?Sized, I: ?Sized> {
    graph: &'a G,
    index: &'a I,
    max_candidates: usize,
}

impl<'a, G, I> Snapper<'a, G, I>
where
    G: RoadGraph + ?Sized,
    I: Scan + ?Sized,
{
    pub fn new(graph: &'a G, index: &'a I) -> Self {
        Self {
            graph,
            index,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn with_max_candidates(self, max_candidates: usize) -> Self {
        Self {
            max_candidates: max_candidates.max(1),
            ..self
        }
    }

    /// The snaps of `point` onto every edge within `radius` meters,
    /// ordered by increasing [`distance_rank`] and then by edge id.
    ///
    /// A tower node shared by several edges is snapped onto once, through
    /// its lowest edge id. Snaps beyond the candidate limit are dropped,
    /// unless they are equidistant to the last retained snap.
    ///
    /// An empty result signals that no edge lies within the radius.
    pub fn snap(&self, point: &Point, radius: f64) -> Result<Vec<Snap>, GraphError> {
        let mut towers: FxHashMap<NodeId, Snap> = FxHashMap::default();
        let mut snaps = Vec::new();

        for proximity in self.index.nearest(point, radius) {
            let snap = self.classify(point, proximity)?;

            match snap.closest_node {
                Some(node) => match towers.entry(node) {
                    Entry::Vacant(vacant) => {
                        vacant.insert(snap);
                    }
                    Entry::Occupied(mut occupied) => {
                        if snap.edge < occupied.get().edge {
                            occupied.insert(snap);
                        }
                    }
                },
                None => snaps.push(snap),
            }
        }

        let ordered = snaps
            .into_iter()
            .chain(towers.into_values())
            .sorted_by_key(|snap| (distance_rank(snap.distance), snap.edge))
            .collect::<Vec<_>>();

        let Some(cutoff) = ordered
            .get(self.max_candidates - 1)
            .map(|last| last.distance + SNAP_EPSILON)
        else {
            return Ok(ordered);
        };

        let retained = ordered
            .into_iter()
            .enumerate()
            .take_while(|(index, snap)| *index < self.max_candidates || snap.distance <= cutoff)
            .map(|(_, snap)| snap)
            .collect::<Vec<_>>();

        trace!("Retained {} snaps within {radius}m", retained.len());
        Ok(retained)
    }

    /// Classifies the nearest position of an edge as a tower, pillar or interior snap.
    pub fn classify(&self, point: &Point, proximity: Proximity) -> Result<Snap, GraphError> {
        let edge = self.graph.edge(proximity.edge)?;
        let offset = proximity.offset.clamp(0.0, edge.length);

        let tower = |node: NodeId, fraction: f64| -> Result<Snap, GraphError> {
            let position = self.graph.node_position(node)?;
            Ok(Snap {
                edge: edge.id,
                position: SnapPosition::Tower,
                offset: fraction,
                point: position,
                distance: Haversine.distance(*point, position),
                closest_node: Some(node),
                pillar: None,
            })
        };

        if offset <= SNAP_EPSILON {
            return tower(edge.base, 0.0);
        }

        if edge.length - offset <= SNAP_EPSILON {
            return tower(edge.adj, 1.0);
        }

        let geometry = self.graph.geometry(edge.id)?;
        let distances = cumulative(&geometry);
        let interior = 1..distances.len().saturating_sub(1);

        let pillar = interior
            .filter(|index| (distances[*index] - offset).abs() <= SNAP_EPSILON)
            .min_by(|a, b| {
                (distances[*a] - offset)
                    .abs()
                    .total_cmp(&(distances[*b] - offset).abs())
            });

        if let Some(index) = pillar {
            let position = Point(geometry.0[index]);
            return Ok(Snap {
                edge: edge.id,
                position: SnapPosition::Pillar,
                offset: distances[index] / edge.length,
                point: position,
                distance: Haversine.distance(*point, position),
                closest_node: None,
                pillar: Some(index),
            });
        }

        Ok(Snap {
            edge: edge.id,
            position: SnapPosition::EdgeInterior,
            offset: offset / edge.length,
            point: proximity.point,
            distance: proximity.distance,
            closest_node: None,
            pillar: None,
        })
    }
}
