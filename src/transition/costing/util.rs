use crate::transition::{EmissionContext, EmissionStrategy, TransitionContext, TransitionStrategy};

pub trait Strategy<Ctx> {
    /// A calculable cost which can be any required
    /// type, so long as it is castable into a 64-bit float.
    type Cost: Into<f64>;

    /// The log-probability of the context, or `None` where the
    /// context is impossible.
    fn calculate(&self, context: Ctx) -> Option<Self::Cost>;

    /// The log-probability of the context, where an impossible
    /// context has a log-probability of negative infinity.
    #[inline]
    fn log_probability(&self, context: Ctx) -> f64 {
        self.calculate(context)
            .map_or(f64::NEG_INFINITY, Into::into)
    }
}

pub trait Costing<Emission, Transition>
where
    Transition: TransitionStrategy,
    Emission: EmissionStrategy,
{
    fn emission(&self, context: EmissionContext) -> f64;
    fn transition(&self, context: TransitionContext) -> f64;
}
