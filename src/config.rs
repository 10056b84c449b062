//! Configuration for a matching run.
//!
//! [`MatchConfig`] is serde-derivable, so it can be embedded into a
//! host application's configuration file, and may otherwise be read
//! from the environment using [`MatchConfig::from_env`], which honours
//! a `.env` file in the working directory.

use crate::error::ConfigError;
use crate::snap::distance_rank;
use crate::transition::Candidate;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;
use strum::{Display, EnumString};

/// GPS measurement error (meters) used for the gaussian emission model.
pub const DEFAULT_SIGMA: f64 = 50.0;
/// Scale of the exponential transition model.
pub const DEFAULT_BETA: f64 = 2.0;
pub const DEFAULT_SEARCH_RADIUS: f64 = 50.0;
pub const DEFAULT_MAX_CANDIDATES: usize = 10;
pub const DEFAULT_MAX_EXPLORE_SLACK: f64 = 4.0;
pub const DEFAULT_MIN_EXPLORE_DISTANCE: f64 = 500.0;
/// 60 m/s (216 km/h)
pub const DEFAULT_MAX_TRANSITION_SPEED: f64 = 60.0;
pub const DEFAULT_GAP_SPLIT_THRESHOLD: Duration = Duration::from_secs(60);

/// Ordering applied between candidates whose cumulative
/// log-probabilities are exactly equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Prefers the lower snap distance, then the lower edge id.
    #[default]
    DistanceThenEdgeId,
    /// Prefers the lower edge id, then the lower snap distance.
    EdgeId,
}

impl TieBreak {
    /// Orders two candidates, where [`Ordering::Less`] marks the preferred one.
    pub fn order(&self, a: &Candidate, b: &Candidate) -> Ordering {
        let distance = distance_rank(a.snap.distance).cmp(&distance_rank(b.snap.distance));
        let edge = a.snap.edge.cmp(&b.snap.edge);

        match self {
            TieBreak::DistanceThenEdgeId => distance.then(edge),
            TieBreak::EdgeId => edge.then(distance),
        }
        .then(a.snap.offset.total_cmp(&b.snap.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Standard deviation (meters) of the GPS measurement error.
    pub measurement_error_sigma: f64,

    /// Scale (meters) of the exponential model of the mismatch
    /// between routed and great-circle displacement.
    pub transition_beta: f64,

    /// Radius (meters) around each observation searched for candidates.
    pub search_radius: f64,

    /// Candidates retained per observation. Candidates equidistant
    /// to the last retained one are kept beyond this count.
    pub max_candidates: usize,

    /// Multiplier on the great-circle distance between two observations
    /// which bounds the route search between their candidates.
    pub max_explore_slack: f64,

    /// Lower bound (meters) on the route search distance.
    pub min_explore_distance: f64,

    /// Maximum implied average speed (m/s) of a transition.
    pub max_transition_speed: f64,

    /// Unmatched observations separating two observations further apart
    /// in time than this split the trace into independent sequences.
    pub unmatched_gap_split_threshold: Duration,

    /// Log-probability penalty applied to tower node snaps.
    pub tower_snap_bias: f64,

    pub tie_break: TieBreak,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            measurement_error_sigma: DEFAULT_SIGMA,
            transition_beta: DEFAULT_BETA,
            search_radius: DEFAULT_SEARCH_RADIUS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_explore_slack: DEFAULT_MAX_EXPLORE_SLACK,
            min_explore_distance: DEFAULT_MIN_EXPLORE_DISTANCE,
            max_transition_speed: DEFAULT_MAX_TRANSITION_SPEED,
            unmatched_gap_split_threshold: DEFAULT_GAP_SPLIT_THRESHOLD,
            tower_snap_bias: 0.0,
            tie_break: TieBreak::default(),
        }
    }
}

fn overlay<T, F>(lookup: &F, key: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(key) {
        match value.trim().parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => return Err(ConfigError::InvalidValue { key, value }),
        }
    }

    Ok(())
}

impl MatchConfig {
    /// Reads the configuration from `MATCH_*` environment variables,
    /// after loading a `.env` file if one is present. Unset variables
    /// keep their default value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut gap_secs = config.unmatched_gap_split_threshold.as_secs_f64();

        overlay(&lookup, "MATCH_MEASUREMENT_ERROR_SIGMA", &mut config.measurement_error_sigma)?;
        overlay(&lookup, "MATCH_TRANSITION_BETA", &mut config.transition_beta)?;
        overlay(&lookup, "MATCH_SEARCH_RADIUS", &mut config.search_radius)?;
        overlay(&lookup, "MATCH_MAX_CANDIDATES", &mut config.max_candidates)?;
        overlay(&lookup, "MATCH_MAX_EXPLORE_SLACK", &mut config.max_explore_slack)?;
        overlay(&lookup, "MATCH_MIN_EXPLORE_DISTANCE", &mut config.min_explore_distance)?;
        overlay(&lookup, "MATCH_MAX_TRANSITION_SPEED", &mut config.max_transition_speed)?;
        overlay(&lookup, "MATCH_UNMATCHED_GAP_SPLIT_SECS", &mut gap_secs)?;
        overlay(&lookup, "MATCH_TOWER_SNAP_BIAS", &mut config.tower_snap_bias)?;
        overlay(&lookup, "MATCH_TIE_BREAK", &mut config.tie_break)?;

        config.unmatched_gap_split_threshold = Duration::try_from_secs_f64(gap_secs)
            .map_err(|_| ConfigError::InvalidValue {
                key: "MATCH_UNMATCHED_GAP_SPLIT_SECS",
                value: gap_secs.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("measurement_error_sigma", self.measurement_error_sigma),
            ("transition_beta", self.transition_beta),
            ("search_radius", self.search_radius),
            ("max_explore_slack", self.max_explore_slack),
            ("max_transition_speed", self.max_transition_speed),
        ];

        if let Some((name, value)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(ConfigError::InvalidConfig(format!(
                "{name} must be positive and finite, got {value}"
            )));
        }

        if self.max_candidates == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_candidates must be at least 1".to_string(),
            ));
        }

        if !(self.min_explore_distance >= 0.0 && self.tower_snap_bias >= 0.0) {
            return Err(ConfigError::InvalidConfig(
                "min_explore_distance and tower_snap_bias must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
