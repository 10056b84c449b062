use crate::snap::Snap;
use crate::transition::Strategy;

pub trait EmissionStrategy: for<'a> Strategy<EmissionContext<'a>> + Send + Sync {}
impl<T> EmissionStrategy for T where T: for<'a> Strategy<EmissionContext<'a>> + Send + Sync {}

#[derive(Clone, Copy, Debug)]
pub struct EmissionContext<'a> {
    /// The proposed (candidate) snap to be matched onto.
    ///
    /// This belongs to the network, and is not provided
    /// as input to the match query.
    pub snap: &'a Snap,

    /// The position the costing method is matching.
    ///
    /// This belongs to the un-matched trip, as the position
    /// which must be matched upon the network.
    pub source_position: &'a geo::Point,
}

impl<'a> EmissionContext<'a> {
    pub fn new(snap: &'a Snap, source: &'a geo::Point) -> Self {
        Self {
            snap,
            source_position: source,
        }
    }

    /// The distance (in meters) between the source and candidate positions.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.snap.distance
    }
}
