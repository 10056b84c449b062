use crate::graph::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Default travel speed (km/h) of an edge, in both directions.
pub const DEFAULT_SPEED: f64 = 50.0;

/// Per-direction access flags of an edge. The forward
/// direction runs from the edge's `base` to its `adj` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Access {
    pub forward: bool,
    pub backward: bool,
}

impl Access {
    pub const BOTH: Access = Access {
        forward: true,
        backward: true,
    };

    /// Travel is only permitted from `base` to `adj`.
    pub const ONE_WAY: Access = Access {
        forward: true,
        backward: false,
    };

    pub const NONE: Access = Access {
        forward: false,
        backward: false,
    };

    #[inline]
    pub fn allows(&self, reverse: bool) -> bool {
        if reverse {
            self.backward
        } else {
            self.forward
        }
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::BOTH
    }
}

/// Per-direction travel speed in km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub forward: f64,
    pub backward: f64,
}

impl Speed {
    pub const fn uniform(speed: f64) -> Self {
        Speed {
            forward: speed,
            backward: speed,
        }
    }

    #[inline]
    pub fn towards(&self, reverse: bool) -> f64 {
        if reverse {
            self.backward
        } else {
            self.forward
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed::uniform(DEFAULT_SPEED)
    }
}

/// A read-only view of a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeState {
    pub id: EdgeId,
    pub base: NodeId,
    pub adj: NodeId,
    /// Length of the edge geometry in meters.
    pub length: f64,
    pub access: Access,
    pub speed: Speed,
}

/// An edge, along with the direction it is travelled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traversal {
    pub edge: EdgeState,
    pub reverse: bool,
}

impl Traversal {
    pub fn new(edge: EdgeState, reverse: bool) -> Self {
        Self { edge, reverse }
    }

    /// The traversal of `edge` which departs `node`, if the edge touches it.
    pub fn departing(edge: EdgeState, node: NodeId) -> Option<Self> {
        if edge.base == node {
            Some(Self::new(edge, false))
        } else if edge.adj == node {
            Some(Self::new(edge, true))
        } else {
            None
        }
    }

    /// The node this traversal departs from.
    #[inline]
    pub fn from(&self) -> NodeId {
        if self.reverse {
            self.edge.adj
        } else {
            self.edge.base
        }
    }

    /// The node this traversal arrives at.
    #[inline]
    pub fn to(&self) -> NodeId {
        if self.reverse {
            self.edge.base
        } else {
            self.edge.adj
        }
    }

    #[inline]
    pub fn allowed(&self) -> bool {
        self.edge.access.allows(self.reverse)
    }
}
