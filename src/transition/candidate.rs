use crate::graph::NodeId;
use crate::snap::Snap;

/// A hypothesised position of an observation upon the network.
///
/// The snap always refers to the base graph, whilst the
/// routing node may be a virtual node of the call's overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Index of the observation within the input trace.
    pub observation: usize,
    pub snap: Snap,
    /// The node routes to and from this candidate begin and end at.
    pub node: NodeId,
    /// Emission log-probability.
    pub emission: f64,
}
