use crate::error::GraphError;
use crate::graph::geometry::cut;
use crate::graph::{EdgeState, NodeId, RoadGraph};
use crate::snap::Snap;

use geo::{Coord, LineString, Point};
use strum::{Display, EnumString};

/// An observation attributed to an edge of the match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedState {
    /// Index of the observation within the input trace.
    pub observation: usize,
    /// The observed position.
    pub point: Point,
    /// The chosen snap of the observation, upon the base graph.
    pub snap: Snap,
}

/// A contiguous stretch of travel along a single base graph edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMatch {
    pub edge: EdgeState,
    pub reverse: bool,

    /// Fraction of the edge, from its base node, at which travel enters it.
    pub entry_offset: f64,
    /// Fraction of the edge, from its base node, at which travel leaves it.
    pub exit_offset: f64,

    /// Meters travelled along the edge.
    pub length: f64,

    /// The observations attributed to this edge, in trace order.
    pub states: Vec<MatchedState>,
}

impl EdgeMatch {
    /// Whether travel covers the edge from tower to tower.
    pub fn is_complete(&self) -> bool {
        (self.entry_offset - self.exit_offset).abs() >= 1.0
    }

    /// The node this stretch enters the edge from, if it enters at a tower.
    pub fn entry_node(&self) -> Option<NodeId> {
        self.tower_at(self.entry_offset)
    }

    /// The node this stretch leaves the edge by, if it leaves at a tower.
    pub fn exit_node(&self) -> Option<NodeId> {
        self.tower_at(self.exit_offset)
    }

    fn tower_at(&self, offset: f64) -> Option<NodeId> {
        if offset <= 0.0 {
            Some(self.edge.base)
        } else if offset >= 1.0 {
            Some(self.edge.adj)
        } else {
            None
        }
    }

    /// The travelled part of the edge geometry, in the direction of travel.
    pub fn geometry<G: RoadGraph + ?Sized>(&self, graph: &G) -> Result<LineString, GraphError> {
        let full = graph.geometry(self.edge.id)?;
        let mut part = cut(
            &full,
            self.entry_offset.min(self.exit_offset),
            self.entry_offset.max(self.exit_offset),
        );

        if self.reverse {
            part.0.reverse();
        }

        Ok(part)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The travelled edges, in order. Consecutive edges share a node.
    pub edges: Vec<EdgeMatch>,

    /// Total meters travelled.
    pub length: f64,

    /// Total travel time, edges and turns included.
    pub millis: i64,

    /// Indices of the observations consumed, in trace order.
    pub observations: Vec<usize>,

    /// Great circle length (meters) through the consumed observations.
    pub observation_length: f64,

    /// Log-probability of the decoded candidate sequence.
    pub log_probability: f64,
}

impl MatchResult {
    pub fn states(&self) -> impl Iterator<Item = &MatchedState> {
        self.edges.iter().flat_map(|edge| edge.states.iter())
    }

    /// The travelled path as a single line.
    pub fn geometry<G: RoadGraph + ?Sized>(&self, graph: &G) -> Result<LineString, GraphError> {
        let mut coords: Vec<Coord> = Vec::new();

        for edge in &self.edges {
            for coord in edge.geometry(graph)?.0 {
                if coords.last() != Some(&coord) {
                    coords.push(coord);
                }
            }
        }

        Ok(LineString::new(coords))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum UnmatchedReason {
    /// No edge lies within the search radius of the observation.
    NoCandidatesForObservation,
    /// The observation could not be joined to any neighbour, leaving
    /// it in a sub-sequence of fewer than two observations.
    SequenceTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unmatched {
    pub observation: usize,
    pub reason: UnmatchedReason,
}

/// Every observation of the trace appears exactly once, either
/// within one of the results, or within the unmatched list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchOutcome {
    /// One result per contiguous matched sub-sequence, in trace order.
    pub results: Vec<MatchResult>,
    /// Observations left unmatched, in trace order.
    pub unmatched: Vec<Unmatched>,
}

impl MatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty() && self.results.len() == 1
    }

    /// Total meters travelled across every result.
    pub fn length(&self) -> f64 {
        self.results.iter().map(|result| result.length).sum()
    }

    pub fn millis(&self) -> i64 {
        self.results.iter().map(|result| result.millis).sum()
    }
}
