use crate::graph::NodeId;
use crate::matcher::Observation;
use crate::snap::Snap;
use crate::transition::{
    Candidate, Costing, CostingStrategies, EmissionContext, EmissionStrategy, TransitionStrategy,
};

use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelIterator};

/// The candidates of a single observation.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Index of the observation within the input trace.
    pub observation: usize,
    pub origin: Observation,
    pub candidates: Vec<Candidate>,
}

impl Layer {
    /// Builds the layer of an observation from its snaps and their
    /// routing nodes, scoring each candidate by the emission strategy.
    pub fn new<E, T>(
        observation: usize,
        origin: Observation,
        snaps: &[Snap],
        nodes: &[NodeId],
        costing: &CostingStrategies<E, T>,
    ) -> Self
    where
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        let candidates = snaps
            .iter()
            .zip(nodes)
            .map(|(snap, node)| Candidate {
                observation,
                snap: *snap,
                node: *node,
                emission: costing.emission(EmissionContext::new(snap, &origin.point)),
            })
            .collect();

        Layer {
            observation,
            origin,
            candidates,
        }
    }
}

#[derive(Default, Debug)]
pub struct Layers {
    pub layers: Vec<Layer>,
}

impl FromParallelIterator<Layer> for Layers {
    fn from_par_iter<I>(layers: I) -> Self
    where
        I: IntoParallelIterator<Item = Layer>,
    {
        let layers = layers.into_par_iter().collect::<Vec<Layer>>();
        Self { layers }
    }
}
