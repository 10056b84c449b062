use crate::error::GraphError;
use crate::graph::{RoadGraph, Traversal};
use crate::matcher::Observation;
use crate::overlay::QueryOverlay;
use crate::result::{EdgeMatch, MatchResult, MatchedState};
use crate::solver::DecodedRun;
use crate::transition::Trellis;

use geo::{Distance, Haversine};
use log::{log_enabled, trace, Level};
use wkt::ToWkt;

/// Offsets closer than this are considered the same position along an edge.
const OFFSET_TOLERANCE: f64 = 1e-9;

/// Converts decoded runs into [`MatchResult`]s over the base graph.
///
/// The routes realised between consecutive chosen candidates are
/// concatenated, every virtual edge is translated back onto the base
/// edge it was cut from, and consecutive pieces of the same edge
/// travelled in the same direction are merged.
pub struct Assembler<'a, 'g, G: ?Sized> {
    overlay: &'a QueryOverlay<'g, G>,
}

impl<'a, 'g, G> Assembler<'a, 'g, G>
where
    G: RoadGraph + ?Sized,
{
    pub fn new(overlay: &'a QueryOverlay<'g, G>) -> Self {
        Self { overlay }
    }

    /// Assembles a decoded run of `trellis`.
    ///
    /// An observation is attributed to the edge its route arrives by, or
    /// for the first observation of the run, the edge its route departs by.
    /// A run which never moves is attributed to the snapped edge itself.
    pub fn assemble(
        &self,
        trellis: &Trellis,
        run: &DecodedRun,
        observations: &[Observation],
    ) -> Result<MatchResult, GraphError> {
        let candidates = run.candidates(trellis).collect::<Vec<_>>();

        let mut edges: Vec<EdgeMatch> = Vec::new();
        let mut pending: Vec<MatchedState> = Vec::new();
        let mut millis = 0;

        for (step, candidate) in candidates.iter().enumerate() {
            if step > 0 {
                let layer = run.layers.start + step - 1;
                let arc = trellis
                    .transitions
                    .get(layer)
                    .and_then(|matrix| matrix.get(run.states[step - 1], run.states[step]))
                    .ok_or(GraphError::ExcludedTransition(layer))?;

                millis += arc.route.millis();
                for traversal in &arc.route.path {
                    self.extend(&mut edges, traversal, &mut pending)?;
                }
            }

            let Some(observation) = observations.get(candidate.observation) else {
                continue;
            };

            let state = MatchedState {
                observation: candidate.observation,
                point: observation.point,
                snap: candidate.snap,
            };

            match edges.last_mut() {
                Some(edge) => edge.states.push(state),
                None => pending.push(state),
            }
        }

        if let (true, Some(first)) = (edges.is_empty(), candidates.first()) {
            let edge = self.overlay.base().edge(first.snap.edge)?;
            edges.push(EdgeMatch {
                edge,
                reverse: false,
                entry_offset: first.snap.offset,
                exit_offset: first.snap.offset,
                length: 0.0,
                states: std::mem::take(&mut pending),
            });
        }

        let observation_length = candidates
            .windows(2)
            .filter_map(|pair| {
                let from = observations.get(pair[0].observation)?;
                let to = observations.get(pair[1].observation)?;
                Some(Haversine.distance(from.point, to.point))
            })
            .sum();

        let result = MatchResult {
            length: edges.iter().map(|edge| edge.length).sum(),
            millis,
            observations: candidates
                .iter()
                .map(|candidate| candidate.observation)
                .collect(),
            observation_length,
            log_probability: run.log_probability,
            edges,
        };

        if log_enabled!(Level::Trace) {
            if let Ok(line) = result.geometry(self.overlay.base()) {
                trace!("Assembled {}", line.wkt_string());
            }
        }

        Ok(result)
    }

    fn extend(
        &self,
        edges: &mut Vec<EdgeMatch>,
        traversal: &Traversal,
        pending: &mut Vec<MatchedState>,
    ) -> Result<(), GraphError> {
        let origin = self.overlay.resolve(traversal.edge.id)?;
        let edge = self.overlay.base().edge(origin.edge)?;

        let (entry, exit) = if traversal.reverse {
            (origin.to_offset, origin.from_offset)
        } else {
            (origin.from_offset, origin.to_offset)
        };

        match edges.last_mut() {
            Some(last)
                if last.edge.id == edge.id
                    && last.reverse == traversal.reverse
                    && (last.exit_offset - entry).abs() <= OFFSET_TOLERANCE =>
            {
                last.exit_offset = exit;
                last.length = edge.length * (exit - last.entry_offset).abs();
            }
            _ => edges.push(EdgeMatch {
                edge,
                reverse: traversal.reverse,
                entry_offset: entry,
                exit_offset: exit,
                length: edge.length * (exit - entry).abs(),
                states: vec![],
            }),
        }

        if let Some(last) = edges.last_mut() {
            last.states.append(pending);
        }

        Ok(())
    }
}
