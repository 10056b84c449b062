use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::matcher::Observation;
use crate::result::MatchOutcome;
use crate::weighting::Weighting;

pub trait Match {
    /// Matches a trace of [observations](Observation) against the map.
    ///
    /// Matching involves the use of a hidden markov model, through
    /// the [`transition`](crate::transition) module, which collapses
    /// the trace onto the most probable sequence of edges travelled.
    fn r#match<W: Weighting + ?Sized>(
        &self,
        observations: &[Observation],
        weighting: &W,
        config: &MatchConfig,
    ) -> Result<MatchOutcome, MatchError>;
}
