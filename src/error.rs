use crate::graph::{EdgeId, NodeId};
use thiserror::Error;

/// A read against a [`RoadGraph`](crate::graph::RoadGraph) returned
/// a reference which the graph does not hold, or holds in a malformed state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0} is not part of the graph")]
    MissingNode(NodeId),

    #[error("edge {0} is not part of the graph")]
    MissingEdge(EdgeId),

    #[error("edge {0} has degenerate geometry")]
    DegenerateGeometry(EdgeId),

    #[error("edge {edge} is not connected to node {node}")]
    DisconnectedEdge { edge: EdgeId, node: NodeId },

    #[error("decoded run crosses an excluded transition after layer {0}")]
    ExcludedTransition(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// No sub-sequence of the trace held two or more decodable observations.
    #[error("trace yields no usable sub-sequence ({usable} observations had candidates)")]
    SequenceTooShort { usable: usize },

    #[error("graph contract violated: {0}")]
    GraphInconsistency(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("match was cancelled")]
    Cancelled,
}
