//! Projection of observations onto nearby edges.
//!
//! A [`Scan`] implementation yields the raw [`Proximity`] of every edge
//! near a point. The [`Snapper`] classifies each of them as a tower node,
//! a pillar point or an edge interior position, producing a [`Snap`].

#[doc(hidden)]
pub mod entry;
#[doc(hidden)]
pub mod scan;
#[doc(hidden)]
pub mod snapper;


#[doc(inline)]
pub use entry::*;
#[doc(inline)]
pub use scan::*;
#[doc(inline)]
pub use snapper::*;
