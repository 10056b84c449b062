use crate::config::MatchConfig;
use crate::error::{GraphError, MatchError};
use crate::graph::{Graph, RoadGraph};
use crate::matcher::{Match, Observation};
use crate::overlay::QueryOverlay;
use crate::result::{Assembler, MatchOutcome, MatchResult, Unmatched, UnmatchedReason};
use crate::route::TransitionOracle;
use crate::snap::{Scan, Snap, Snapper};
use crate::solver::Viterbi;
use crate::transition::*;
use crate::weighting::Weighting;

use log::{debug, info};
use measure_time::debug_time;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
#[cfg(feature = "tracing")]
use tracing::Level;

/// Matches traces against a road graph and its spatial index.
///
/// A matcher holds no state between calls: every call materializes its
/// own overlay, candidates and trellis, so a single matcher may serve
/// many calls concurrently.
pub struct Matcher<'a, G: ?Sized, I: ?Sized, E = GaussianEmission, T = ExponentialTransition>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    graph: &'a G,
    index: &'a I,
    config: MatchConfig,
    costing: CostingStrategies<E, T>,
}

/// The outcome of a single contiguous sequence of observations.
#[derive(Default)]
struct SequenceOutcome {
    results: Vec<MatchResult>,
    /// Observations of runs too short to form a result.
    short: Vec<usize>,
}

impl<'a, G, I> Matcher<'a, G, I>
where
    G: RoadGraph + ?Sized,
    I: Scan + ?Sized,
{
    /// A matcher scoring candidates with the gaussian emission and
    /// exponential transition models, parameterised by `config`.
    pub fn new(graph: &'a G, index: &'a I, config: MatchConfig) -> Self {
        Self {
            graph,
            index,
            costing: CostingStrategies::from_config(&config),
            config,
        }
    }
}

impl<'a, G, I, E, T> Matcher<'a, G, I, E, T>
where
    G: RoadGraph + ?Sized,
    I: Scan + ?Sized,
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    /// Replaces the costing strategies of the matcher.
    pub fn with_costing<E2, T2>(self, costing: CostingStrategies<E2, T2>) -> Matcher<'a, G, I, E2, T2>
    where
        E2: EmissionStrategy,
        T2: TransitionStrategy,
    {
        Matcher {
            graph: self.graph,
            index: self.index,
            config: self.config,
            costing,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn match_trace<W>(
        &self,
        observations: &[Observation],
        weighting: &W,
    ) -> Result<MatchOutcome, MatchError>
    where
        W: Weighting + ?Sized,
    {
        self.match_cancellable(observations, weighting, &Cancellation::new())
    }

    /// Matches a trace, checking `cancellation` between
    /// sequences and between transition evaluations.
    ///
    /// Observations without a candidate are reported unmatched, and may
    /// split the trace into independently matched sequences. Fails with
    /// [`MatchError::SequenceTooShort`] when no sequence yields a result.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::INFO))]
    pub fn match_cancellable<W>(
        &self,
        observations: &[Observation],
        weighting: &W,
        cancellation: &Cancellation,
    ) -> Result<MatchOutcome, MatchError>
    where
        W: Weighting + ?Sized,
    {
        info!(
            "Matching {} observations using {} weighting",
            observations.len(),
            weighting.name()
        );
        debug_time!("map match");

        self.config.validate()?;
        cancellation.check()?;

        let snapper = Snapper::new(self.graph, self.index)
            .with_max_candidates(self.config.max_candidates);

        let snaps = observations
            .par_iter()
            .map(|observation| snapper.snap(&observation.point, self.config.search_radius))
            .collect::<Result<Vec<_>, GraphError>>()?;

        let mut unmatched = snaps
            .iter()
            .enumerate()
            .filter(|(_, snaps)| snaps.is_empty())
            .map(|(observation, _)| Unmatched {
                observation,
                reason: UnmatchedReason::NoCandidatesForObservation,
            })
            .collect::<Vec<_>>();

        let usable = observations.len() - unmatched.len();
        let sequences = self.partition(observations, &snaps);
        debug!(
            "{usable} of {} observations have candidates, across {} sequences",
            observations.len(),
            sequences.len()
        );

        let mut results = Vec::new();
        for sequence in sequences {
            cancellation.check()?;

            let outcome = if sequence.len() < 2 {
                SequenceOutcome {
                    results: vec![],
                    short: sequence,
                }
            } else {
                self.match_sequence(&sequence, observations, &snaps, weighting, cancellation)?
            };

            results.extend(outcome.results);
            unmatched.extend(outcome.short.into_iter().map(|observation| Unmatched {
                observation,
                reason: UnmatchedReason::SequenceTooShort,
            }));
        }

        if results.is_empty() {
            return Err(MatchError::SequenceTooShort { usable });
        }

        unmatched.sort_by_key(|unmatched| unmatched.observation);
        info!(
            "Matched {} sequences, leaving {} observations unmatched",
            results.len(),
            unmatched.len()
        );

        Ok(MatchOutcome { results, unmatched })
    }

    /// Groups the observations holding candidates into independent sequences.
    ///
    /// A sequence ends where a gap of observations without candidates
    /// separates two observations whose elapsed time exceeds the split
    /// threshold, or cannot be known.
    fn partition(&self, observations: &[Observation], snaps: &[Vec<Snap>]) -> Vec<Vec<usize>> {
        let threshold = self.config.unmatched_gap_split_threshold.as_secs_f64();

        let mut sequences = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut gap = false;

        for (index, snaps) in snaps.iter().enumerate() {
            if snaps.is_empty() {
                gap = true;
                continue;
            }

            if let (true, Some(&last)) = (gap, current.last()) {
                let split = observations[last]
                    .elapsed_until(&observations[index])
                    .map_or(true, |elapsed| elapsed > threshold);

                if split {
                    sequences.push(std::mem::take(&mut current));
                }
            }

            gap = false;
            current.push(index);
        }

        if !current.is_empty() {
            sequences.push(current);
        }

        sequences
    }

    fn match_sequence<W>(
        &self,
        sequence: &[usize],
        observations: &[Observation],
        snaps: &[Vec<Snap>],
        weighting: &W,
        cancellation: &Cancellation,
    ) -> Result<SequenceOutcome, MatchError>
    where
        W: Weighting + ?Sized,
    {
        let flattened = sequence
            .iter()
            .flat_map(|&index| snaps[index].iter().copied())
            .collect::<Vec<_>>();

        let (overlay, nodes) = QueryOverlay::materialize(self.graph, &flattened)?;

        let offsets = sequence
            .iter()
            .scan(0, |offset, &index| {
                let start = *offset;
                *offset += snaps[index].len();
                Some(start)
            })
            .collect::<Vec<_>>();

        let Layers { layers } = sequence
            .par_iter()
            .zip(offsets.par_iter())
            .map(|(&index, &start)| {
                let snaps = &snaps[index];
                let nodes = &nodes[start..start + snaps.len()];
                Layer::new(index, observations[index], snaps, nodes, &self.costing)
            })
            .collect();

        let trellis = Trellis::build(
            &overlay,
            weighting,
            &self.costing,
            &self.config,
            layers,
            cancellation,
        )?;

        let oracle = TransitionOracle::new(&overlay, weighting);
        let runs = Viterbi::new(self.config.tie_break)
            .decode_with(&trellis, |arriving, via, departing| {
                oracle.permits_handoff(arriving, via, departing)
            });
        let assembler = Assembler::new(&overlay);

        let mut outcome = SequenceOutcome::default();
        for run in runs {
            if run.len() < 2 {
                outcome.short.extend(
                    trellis.layers[run.layers.clone()]
                        .iter()
                        .map(|layer| layer.observation),
                );
                continue;
            }

            outcome
                .results
                .push(assembler.assemble(&trellis, &run, observations)?);
        }

        Ok(outcome)
    }
}

impl Match for Graph {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::INFO))]
    fn r#match<W: Weighting + ?Sized>(
        &self,
        observations: &[Observation],
        weighting: &W,
        config: &MatchConfig,
    ) -> Result<MatchOutcome, MatchError> {
        Matcher::new(self, self, config.clone()).match_trace(observations, weighting)
    }
}
