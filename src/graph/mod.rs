//! The road network read contract consumed by the matcher, and an
//! in-memory reference implementation of it.
//!
//! The matcher only ever reads the network through [`RoadGraph`], so a
//! production graph store may be substituted for [`Graph`]. Edges are
//! stored once, undirected, oriented from their `base` to their `adj`
//! node, and are travelled either forward or in `reverse`.

#[doc(hidden)]
pub mod builder;
#[doc(hidden)]
pub mod definition;
#[doc(hidden)]
pub mod edge;
#[doc(hidden)]
pub mod geometry;
#[doc(hidden)]
pub mod ids;
#[doc(hidden)]
pub mod index;
#[doc(hidden)]
pub mod memory;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use builder::*;
#[doc(inline)]
pub use definition::*;
#[doc(inline)]
pub use edge::*;
#[doc(inline)]
pub use ids::*;
#[doc(inline)]
pub use index::*;
#[doc(inline)]
pub use memory::*;
