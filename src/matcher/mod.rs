//! Entry points of a matching call.
//!
//! A [`Matcher`] borrows a road graph and its spatial index, and matches
//! traces of [`Observation`]s against them. The [`Match`] trait offers the
//! same upon the in-memory [`Graph`](crate::Graph), which is its own index.

#[doc(hidden)]
pub mod definition;
#[doc(hidden)]
pub mod implementation;
#[doc(hidden)]
pub mod observation;


#[doc(inline)]
pub use definition::*;
#[doc(inline)]
pub use implementation::*;
#[doc(inline)]
pub use observation::*;
