#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod overlay;
pub mod result;
pub mod route;
pub mod snap;
pub mod solver;
pub mod transition;
pub mod weighting;

#[cfg(test)]
pub(crate) mod fixtures;

#[doc(inline)]
pub use config::{MatchConfig, TieBreak};
#[doc(inline)]
pub use error::{ConfigError, GraphError, MatchError};
#[doc(inline)]
pub use graph::{Graph, GraphBuilder, RoadGraph};
#[doc(inline)]
pub use matcher::{Match, Matcher, Observation};
#[doc(inline)]
pub use result::{EdgeMatch, MatchOutcome, MatchResult, Unmatched, UnmatchedReason};
#[doc(inline)]
pub use transition::Cancellation;
#[doc(inline)]
pub use weighting::{DistanceWeighting, FastestWeighting, Weighting, WeightingKind};
