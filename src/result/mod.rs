//! Match results, expressed solely in terms of the base graph.

#[doc(hidden)]
pub mod assembler;
#[doc(hidden)]
pub mod entity;


#[doc(inline)]
pub use assembler::*;
#[doc(inline)]
pub use entity::*;
