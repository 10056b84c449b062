//! The transition cost oracle.
//!
//! Routes between candidate positions are found with an edge-based,
//! bounded Dijkstra search over any [`RoadGraph`](crate::graph::RoadGraph),
//! usually a [`QueryOverlay`](crate::overlay::QueryOverlay), costed
//! through a [`Weighting`](crate::weighting::Weighting).

#[doc(hidden)]
pub mod cost;
#[doc(hidden)]
pub mod dijkstra;
#[doc(hidden)]
pub mod oracle;


#[doc(inline)]
pub use cost::*;
#[doc(inline)]
pub use dijkstra::*;
#[doc(inline)]
pub use oracle::*;
