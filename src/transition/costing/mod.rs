//! You may override individual costing strategies
//! in order to apply custom functionality to the
//! trellis. See the [`Strategy`] trait.
//!
//! ## Structure
//! Strategies are joined onto the aggregate [`CostingStrategies`]
//! structure, which is then supplied to the [`Matcher`](crate::Matcher).
//!
//! Both strategies produce natural-log probabilities. A strategy
//! returning `None` excludes the candidate or transition outright,
//! which the decoder treats as a probability of zero.
//!
//! ### Creating your own strategy
//!
//! Implement [`Strategy`] for your structure, with the context of the
//! heuristic you need to override. The higher-order traits, like
//! [`TransitionStrategy`], are auto-derived for all which implement
//! [`Strategy<TransitionContext>`].
//!
//! ```rust
//! use routers_match::transition::{Strategy, TransitionContext};
//!
//! /// Excludes any route longer than a kilometer.
//! struct ShortHops;
//!
//! impl<'a> Strategy<TransitionContext<'a>> for ShortHops {
//!     type Cost = f64;
//!
//!     fn calculate(&self, context: TransitionContext<'a>) -> Option<f64> {
//!         (context.route.distance() <= 1000.0).then(|| -context.mismatch())
//!     }
//! }
//! ```
//!
//! ### Default Strategies
//! - [`GaussianEmission`]: Emission log-probability, from a zero-mean
//!   gaussian model of the GPS measurement error.
//! - [`ExponentialTransition`]: Transition log-probability, from an
//!   exponential model of the mismatch between the routed and the
//!   great-circle distance of consecutive observations.

#[doc(hidden)]
pub mod default;
#[doc(hidden)]
pub mod emission;
#[doc(hidden)]
pub mod transition;
#[doc(hidden)]
pub mod util;

#[doc(inline)]
pub use default::*;
#[doc(inline)]
pub use emission::*;
#[doc(inline)]
pub use transition::*;
#[doc(inline)]
pub use util::*;
