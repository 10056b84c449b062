pub mod emission {
    use crate::config::{MatchConfig, DEFAULT_SIGMA};
    use crate::transition::*;

    /// Calculates the emission log-probability of a candidate, relative
    /// to the observation it was snapped from.
    ///
    /// ## Calculation
    ///
    /// A zero-mean gaussian of the snap distance, with a fixed
    /// standard deviation `σ`, less a bias discouraging tower snaps.
    ///
    /// ```math
    /// emission(c) = -0.5 * (distance(c) / σ)² - bias(c)
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct GaussianEmission {
        pub sigma: f64,
        pub tower_bias: f64,
    }

    impl Default for GaussianEmission {
        fn default() -> Self {
            Self {
                sigma: DEFAULT_SIGMA,
                tower_bias: 0.0,
            }
        }
    }

    impl From<&MatchConfig> for GaussianEmission {
        fn from(config: &MatchConfig) -> Self {
            Self {
                sigma: config.measurement_error_sigma,
                tower_bias: config.tower_snap_bias,
            }
        }
    }

    impl<'a> Strategy<EmissionContext<'a>> for GaussianEmission {
        type Cost = f64;

        fn calculate(&self, context: EmissionContext<'a>) -> Option<Self::Cost> {
            let deviation = context.distance() / self.sigma;
            let bias = if context.snap.is_tower() {
                self.tower_bias
            } else {
                0.0
            };

            Some(-0.5 * deviation * deviation - bias)
        }
    }
}

pub mod transition {
    use crate::config::{MatchConfig, DEFAULT_BETA, DEFAULT_MAX_TRANSITION_SPEED};
    use crate::transition::*;

    /// Calculates the transition log-probability between two candidates.
    ///
    /// # Calculation
    ///
    /// The mismatch between the routed distance and the great circle
    /// distance of the two observations is modelled exponentially,
    /// with a fixed scale `β`.
    ///
    /// ```math
    /// transition(c, c') = -|route(c, c') - great_circle(o, o')| / β
    /// ```
    ///
    /// The transition is excluded where the route implies an average
    /// speed above `max_speed`, or travels against an access restriction.
    #[derive(Debug, Clone, Copy)]
    pub struct ExponentialTransition {
        pub beta: f64,
        /// Meters per second.
        pub max_speed: f64,
    }

    impl Default for ExponentialTransition {
        fn default() -> Self {
            Self {
                beta: DEFAULT_BETA,
                max_speed: DEFAULT_MAX_TRANSITION_SPEED,
            }
        }
    }

    impl From<&MatchConfig> for ExponentialTransition {
        fn from(config: &MatchConfig) -> Self {
            Self {
                beta: config.transition_beta,
                max_speed: config.max_transition_speed,
            }
        }
    }

    impl<'a> Strategy<TransitionContext<'a>> for ExponentialTransition {
        type Cost = f64;

        fn calculate(&self, context: TransitionContext<'a>) -> Option<Self::Cost> {
            if context.violates_access() {
                return None;
            }

            if context
                .implied_speed()
                .is_some_and(|speed| speed > self.max_speed)
            {
                return None;
            }

            Some(-context.mismatch() / self.beta)
        }
    }
}

pub mod costing {
    use crate::config::MatchConfig;
    use crate::transition::*;

    pub struct CostingStrategies<E, T>
    where
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        emission: E,
        transition: T,
    }

    impl<E, T> CostingStrategies<E, T>
    where
        E: EmissionStrategy,
        T: TransitionStrategy,
    {
        pub fn new(emission: E, transition: T) -> Self {
            Self {
                emission,
                transition,
            }
        }
    }

    impl CostingStrategies<GaussianEmission, ExponentialTransition> {
        /// The default strategies, parameterised by the configuration.
        pub fn from_config(config: &MatchConfig) -> Self {
            CostingStrategies::new(config.into(), config.into())
        }
    }

    impl Default for CostingStrategies<GaussianEmission, ExponentialTransition> {
        fn default() -> Self {
            CostingStrategies::new(GaussianEmission::default(), ExponentialTransition::default())
        }
    }

    impl<E, T> Costing<E, T> for CostingStrategies<E, T>
    where
        T: TransitionStrategy,
        E: EmissionStrategy,
    {
        fn emission(&self, context: EmissionContext) -> f64 {
            self.emission.log_probability(context)
        }

        fn transition(&self, context: TransitionContext) -> f64 {
            self.transition.log_probability(context)
        }
    }
}

#[doc(hidden)]
pub use costing::*;
#[doc(hidden)]
pub use emission::*;
#[doc(hidden)]
pub use transition::*;
