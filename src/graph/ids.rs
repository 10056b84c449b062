use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier of a node (tower) within a road graph.
///
/// Real nodes of a graph occupy `[0, node_count)`. Nodes synthesised
/// by a [`QueryOverlay`](crate::overlay::QueryOverlay) are allocated
/// directly after them, so a lookup only needs to branch on the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier of an edge within a road graph, see [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

macro_rules! identifier {
    ($name:ident) => {
        impl $name {
            #[inline]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(NodeId);
identifier!(EdgeId);
