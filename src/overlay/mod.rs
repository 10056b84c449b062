//! Per-call virtual nodes and edges.
//!
//! A [`QueryOverlay`] splits the edges of a base graph at snapped
//! positions, so that routes may begin and end exactly upon them,
//! without ever mutating the base graph. Overlay ids are allocated
//! directly after the base graph's own, and an overlay is discarded
//! at the end of the matching call which created it.

#[doc(hidden)]
pub mod query;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use query::*;
