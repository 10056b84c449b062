use crate::config::TieBreak;
use crate::graph::{EdgeId, NodeId};
use crate::transition::{Candidate, Layer, Trellis};

use log::debug;
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;
use std::ops::Range;

/// A maximal run of layers through which the trellis remained connected.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRun {
    /// The trellis layers spanned by this run.
    pub layers: Range<usize>,
    /// The chosen candidate index within each layer of the run.
    pub states: Vec<usize>,
    /// Cumulative log-probability of the chosen sequence.
    pub log_probability: f64,
}

impl DecodedRun {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The chosen candidate of every layer in the run, in order.
    pub fn candidates<'a>(&'a self, trellis: &'a Trellis) -> impl Iterator<Item = &'a Candidate> + 'a {
        self.layers
            .clone()
            .zip(&self.states)
            .filter_map(|(layer, state)| trellis.layers.get(layer)?.candidates.get(*state))
    }
}

/// The best path found so far onto a candidate, arriving by a given edge.
#[derive(Debug, Clone, Copy)]
struct Entry {
    /// The edge the path arrives at the candidate's node by, or `None`
    /// where the path has not moved since the start of its run.
    arriving: Option<EdgeId>,
    score: f64,
    /// The candidate, and its entry, within the previous layer.
    back: Option<(usize, usize)>,
}

/// The entries of every candidate within a single layer.
type Column = Vec<SmallVec<[Entry; 2]>>;

/// Forward dynamic-programming decoder over log-probabilities.
///
/// For every candidate, the best cumulative log-probability is retained
/// per edge the candidate's node may be arrived by, together with a
/// back-pointer to the predecessor achieving it. This lets the turn
/// joining two consecutive routes at a candidate be checked against the
/// route actually arriving there.
///
/// Where every candidate of a layer is unreachable, the current run ends
/// on the layer before it, and a new run begins from the layer's emissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viterbi {
    tie_break: TieBreak,
}

impl Viterbi {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Whether `(score, candidate)` should be preferred over `(best, incumbent)`.
    #[inline]
    fn prefer(&self, score: f64, candidate: &Candidate, best: f64, incumbent: &Candidate) -> bool {
        match score.partial_cmp(&best) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.tie_break.order(candidate, incumbent).is_lt(),
            _ => false,
        }
    }

    /// Decodes the trellis, permitting every turn between consecutive routes.
    pub fn decode(&self, trellis: &Trellis) -> Vec<DecodedRun> {
        self.decode_with(trellis, |_, _, _| true)
    }

    /// Decodes the trellis, where `handoff(arriving, via, departing)` decides
    /// whether a route arriving at candidate node `via` may be followed by a
    /// route departing it.
    pub fn decode_with<H>(&self, trellis: &Trellis, handoff: H) -> Vec<DecodedRun>
    where
        H: Fn(EdgeId, NodeId, EdgeId) -> bool,
    {
        let layers = &trellis.layers;
        let Some(first) = layers.first() else {
            return vec![];
        };

        let mut runs = Vec::new();
        let mut start = 0;

        let mut columns: Vec<Column> = Vec::with_capacity(layers.len());
        columns.push(Self::initial(first));

        for (index, layer) in layers.iter().enumerate().skip(1) {
            let (previous, matrix) = (&layers[index - 1], &trellis.transitions[index - 1]);
            let prior = &columns[index - 1];

            let column: Column = layer
                .candidates
                .iter()
                .enumerate()
                .map(|(target, candidate)| {
                    let mut entries: SmallVec<[Entry; 2]> = SmallVec::new();

                    for (source, predecessor) in previous.candidates.iter().enumerate() {
                        let Some(arc) = matrix.get(source, target) else {
                            continue;
                        };

                        let departing = arc.route.path.first().map(|traversal| traversal.edge.id);
                        let last = arc.route.path.last().map(|traversal| traversal.edge.id);

                        for (position, entry) in prior[source].iter().enumerate() {
                            let score = entry.score + arc.log_probability;
                            if score == f64::NEG_INFINITY || score.is_nan() {
                                continue;
                            }

                            if let (Some(arriving), Some(departing)) = (entry.arriving, departing) {
                                if !handoff(arriving, predecessor.node, departing) {
                                    continue;
                                }
                            }

                            let arriving = last.or(entry.arriving);
                            let proposed = Entry {
                                arriving,
                                score,
                                back: Some((source, position)),
                            };

                            match entries.iter_mut().find(|entry| entry.arriving == arriving) {
                                None => entries.push(proposed),
                                Some(incumbent) => {
                                    let Some((held, _)) = incumbent.back else {
                                        continue;
                                    };

                                    if self.prefer(
                                        score,
                                        predecessor,
                                        incumbent.score,
                                        &previous.candidates[held],
                                    ) {
                                        *incumbent = proposed;
                                    }
                                }
                            }
                        }
                    }

                    for entry in entries.iter_mut() {
                        entry.score += candidate.emission;
                    }

                    entries
                })
                .collect();

            if column.iter().all(SmallVec::is_empty) {
                debug!("Trellis broken at layer {index}, splitting");
                runs.push(self.backtrack(trellis, &columns, start..index));

                start = index;
                columns.push(Self::initial(layer));
                continue;
            }

            columns.push(column);
        }

        runs.push(self.backtrack(trellis, &columns, start..layers.len()));
        runs
    }

    /// The entries of the first layer of a run, scored by emission alone.
    fn initial(layer: &Layer) -> Column {
        layer
            .candidates
            .iter()
            .map(|candidate| {
                smallvec![Entry {
                    arriving: None,
                    score: candidate.emission,
                    back: None,
                }]
            })
            .collect()
    }

    /// Recovers the best candidate sequence of a run, from its best final entry.
    fn backtrack(&self, trellis: &Trellis, columns: &[Column], layers: Range<usize>) -> DecodedRun {
        let last = layers.end - 1;
        let candidates = &trellis.layers[last].candidates;

        let mut best: Option<(f64, usize, usize)> = None;
        for (index, entries) in columns[last].iter().enumerate() {
            for (position, entry) in entries.iter().enumerate() {
                let better = match best {
                    None => true,
                    Some((incumbent_score, incumbent, _)) if incumbent == index => {
                        entry.score > incumbent_score
                    }
                    Some((incumbent_score, incumbent, _)) => self.prefer(
                        entry.score,
                        &candidates[index],
                        incumbent_score,
                        &candidates[incumbent],
                    ),
                };

                if better {
                    best = Some((entry.score, index, position));
                }
            }
        }

        let Some((log_probability, mut state, mut position)) = best else {
            return DecodedRun {
                layers: layers.start..layers.start,
                states: vec![],
                log_probability: f64::NEG_INFINITY,
            };
        };

        let mut states = vec![state];
        for layer in (layers.start + 1..=last).rev() {
            match columns[layer][state][position].back {
                Some((previous, entry)) => {
                    state = previous;
                    position = entry;
                    states.push(state);
                }
                None => break,
            }
        }

        states.reverse();
        DecodedRun {
            layers,
            states,
            log_probability,
        }
    }
}
