//! Decoding of the most probable candidate sequence through a [`Trellis`](crate::transition::Trellis).

#[doc(hidden)]
pub mod viterbi;


#[doc(inline)]
pub use viterbi::*;
