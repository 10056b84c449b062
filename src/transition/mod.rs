//! A Hidden-Markov-Model (HMM) matching
//! transition module, which weighs the
//! candidate positions of each observation
//! against those of the next.
//!
//! Each observation forms a [`Layer`] of [`Candidate`]s. The [`Trellis`]
//! joins every candidate of a layer to every candidate of the next
//! through a routed [`TransitionArc`], or excludes the transition.

pub mod cancel;
pub mod candidate;
pub mod costing;
pub mod layer;
pub mod trellis;

#[cfg(test)]
mod test;

// Re-Exports
#[doc(inline)]
pub use cancel::*;
#[doc(inline)]
pub use candidate::*;
#[doc(inline)]
pub use costing::*;
#[doc(inline)]
pub use layer::*;
#[doc(inline)]
pub use trellis::*;
