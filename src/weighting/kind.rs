use crate::weighting::{
    DistanceWeighting, FastestWeighting, TurnCostProvider, Weighting, DEFAULT_MAX_SPEED,
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Selects a [`Weighting`] variant at configuration time.
///
/// ```rust
/// use routers_match::weighting::WeightingKind;
///
/// let kind: WeightingKind = "fastest".parse().unwrap();
/// assert_eq!(kind.build().name(), "fastest");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WeightingKind {
    #[default]
    Distance,
    Fastest,
}

impl WeightingKind {
    pub fn build(self) -> Box<dyn Weighting> {
        match self {
            WeightingKind::Distance => Box::new(DistanceWeighting::new()),
            WeightingKind::Fastest => Box::new(FastestWeighting::new(DEFAULT_MAX_SPEED)),
        }
    }

    pub fn build_with<T>(self, turn_costs: T) -> Box<dyn Weighting>
    where
        T: TurnCostProvider + 'static,
    {
        match self {
            WeightingKind::Distance => Box::new(DistanceWeighting::with_turn_costs(turn_costs)),
            WeightingKind::Fastest => Box::new(FastestWeighting::with_turn_costs(
                DEFAULT_MAX_SPEED,
                turn_costs,
            )),
        }
    }
}
