use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::graph::RoadGraph;
use crate::route::{Route, TransitionOracle};
use crate::transition::{
    Cancellation, Costing, CostingStrategies, EmissionStrategy, Layer, TransitionContext,
    TransitionStrategy,
};
use crate::weighting::Weighting;

use geo::{Distance, Haversine};
use log::debug;
use measure_time::debug_time;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
#[cfg(feature = "tracing")]
use tracing::Level;

/// A permitted transition between two candidates of consecutive layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionArc {
    pub log_probability: f64,
    /// The route realised between the two candidates' routing nodes.
    pub route: Route,
}

/// Transitions from every candidate of a layer to every candidate of the next.
#[derive(Debug, Clone, Default)]
pub struct TransitionMatrix {
    sources: usize,
    targets: usize,
    arcs: Vec<Option<TransitionArc>>,
}

impl TransitionMatrix {
    pub fn new(sources: usize, targets: usize, arcs: Vec<Option<TransitionArc>>) -> Self {
        debug_assert_eq!(arcs.len(), sources * targets);
        Self {
            sources,
            targets,
            arcs,
        }
    }

    /// The arc from candidate `source` to candidate `target`,
    /// or `None` where the transition is excluded.
    #[inline]
    pub fn get(&self, source: usize, target: usize) -> Option<&TransitionArc> {
        if source >= self.sources || target >= self.targets {
            return None;
        }

        self.arcs
            .get(source * self.targets + target)
            .and_then(Option::as_ref)
    }

    #[inline]
    pub fn log_probability(&self, source: usize, target: usize) -> f64 {
        self.get(source, target)
            .map_or(f64::NEG_INFINITY, |arc| arc.log_probability)
    }

    /// The number of permitted transitions.
    pub fn permitted(&self) -> usize {
        self.arcs.iter().flatten().count()
    }
}

/// The time-expanded candidate graph of a sequence of observations.
///
/// `transitions[k]` joins `layers[k]` to `layers[k + 1]`.
#[derive(Debug, Clone, Default)]
pub struct Trellis {
    pub layers: Vec<Layer>,
    pub transitions: Vec<TransitionMatrix>,
}

/// Shared, read-only inputs of every transition evaluation.
struct Evaluation<'a, G: ?Sized, W: ?Sized, E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    oracle: TransitionOracle<'a, G, W>,
    weighting: &'a W,
    costing: &'a CostingStrategies<E, T>,
    config: &'a MatchConfig,
}

impl<G, W, E, T> Evaluation<'_, G, W, E, T>
where
    G: RoadGraph + ?Sized,
    W: Weighting + ?Sized,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    /// The weight ceiling of route searches between two observations
    /// `great_circle` meters apart.
    fn max_explore(&self, great_circle: f64) -> f64 {
        let distance = (great_circle * self.config.max_explore_slack
            + 2.0 * self.config.search_radius)
            .max(self.config.min_explore_distance);

        self.weighting.min_weight(distance)
    }

    /// Transitions from a single candidate of `from` to every candidate of `to`.
    fn row(
        &self,
        from: &Layer,
        to: &Layer,
        source: usize,
    ) -> Result<Vec<Option<TransitionArc>>, MatchError> {
        let Some(candidate) = from.candidates.get(source) else {
            return Ok(vec![None; to.candidates.len()]);
        };

        let great_circle = Haversine.distance(from.origin.point, to.origin.point);
        let elapsed = from.origin.elapsed_until(&to.origin);

        let targets = to
            .candidates
            .iter()
            .map(|target| target.node)
            .collect::<Vec<_>>();

        let routes = self
            .oracle
            .route_costs(candidate.node, &targets, self.max_explore(great_circle))?;

        let arcs = routes
            .into_iter()
            .zip(&to.candidates)
            .map(|(route, target)| {
                let route = route?;
                let log_probability = self.costing.transition(TransitionContext {
                    route: &route,
                    source_candidate: candidate,
                    target_candidate: target,
                    great_circle,
                    elapsed,
                });

                (log_probability > f64::NEG_INFINITY).then_some(TransitionArc {
                    log_probability,
                    route,
                })
            })
            .collect();

        Ok(arcs)
    }
}

impl Trellis {
    /// Evaluates the transitions between every pair of consecutive layers.
    ///
    /// Evaluations run in parallel, one per candidate of every layer but
    /// the last, and are collected in order, so the resulting trellis does
    /// not depend upon the order in which they complete. The cancellation
    /// flag is checked before each evaluation.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::INFO, skip_all))]
    pub fn build<G, W, E, T>(
        graph: &G,
        weighting: &W,
        costing: &CostingStrategies<E, T>,
        config: &MatchConfig,
        layers: Vec<Layer>,
        cancellation: &Cancellation,
    ) -> Result<Self, MatchError>
    where
        G: RoadGraph + ?Sized,
        W: Weighting + ?Sized,
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        debug_time!("trellis construction");

        let evaluation = Evaluation {
            oracle: TransitionOracle::new(graph, weighting),
            weighting,
            costing,
            config,
        };

        let jobs = layers
            .windows(2)
            .enumerate()
            .flat_map(|(pair, window)| {
                (0..window[0].candidates.len()).map(move |source| (pair, source))
            })
            .collect::<Vec<_>>();

        let rows = jobs
            .into_par_iter()
            .map(|(pair, source)| {
                cancellation.check()?;
                evaluation.row(&layers[pair], &layers[pair + 1], source)
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        let mut rows = rows.into_iter();
        let transitions = layers
            .windows(2)
            .map(|window| {
                let (sources, targets) = (window[0].candidates.len(), window[1].candidates.len());
                let arcs = rows.by_ref().take(sources).flatten().collect();
                TransitionMatrix::new(sources, targets, arcs)
            })
            .collect::<Vec<_>>();

        debug!(
            "Trellis of {} layers permits {} transitions",
            layers.len(),
            transitions.iter().map(TransitionMatrix::permitted).sum::<usize>()
        );

        Ok(Trellis {
            layers,
            transitions,
        })
    }
}
