//! Edge and turn weighting.
//!
//! A [`Weighting`] maps a directed edge to a cost and a travel time, and
//! a turn between two edges at a node to an additional cost and time.
//! Weightings are selected once per matching run, usually through a
//! [`WeightingKind`], and shared read-only across all transition searches.
//!
//! Two variants are provided:
//! - [`DistanceWeighting`]: the cost of an edge is its length.
//! - [`FastestWeighting`]: the cost of an edge is the seconds taken to
//!   travel it at its directional speed.
//!
//! Both accept a [`TurnCostProvider`], [`NoTurnCost`] by default.

#[doc(hidden)]
pub mod definition;
#[doc(hidden)]
pub mod distance;
#[doc(hidden)]
pub mod fastest;
#[doc(hidden)]
pub mod kind;
#[doc(hidden)]
pub mod turn;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use definition::*;
#[doc(inline)]
pub use distance::*;
#[doc(inline)]
pub use fastest::*;
#[doc(inline)]
pub use kind::*;
#[doc(inline)]
pub use turn::*;
