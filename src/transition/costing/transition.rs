use crate::route::Route;
use crate::transition::{Candidate, Strategy};

pub trait TransitionStrategy: for<'a> Strategy<TransitionContext<'a>> + Send + Sync {}
impl<T> TransitionStrategy for T where T: for<'a> Strategy<TransitionContext<'a>> + Send + Sync {}

#[derive(Clone, Copy, Debug)]
pub struct TransitionContext<'a> {
    /// The optimal route travelled between the
    /// source candidate and target candidate.
    pub route: &'a Route,

    /// The source candidate indicating the edge and
    /// position for which the route begins at.
    pub source_candidate: &'a Candidate,

    /// The target candidate indicating the edge and
    /// position for which the route ends at.
    pub target_candidate: &'a Candidate,

    /// The great circle distance (meters) between the two observations.
    pub great_circle: f64,

    /// The seconds elapsed between the two observations,
    /// where both observations carry a timestamp.
    pub elapsed: Option<f64>,
}

impl TransitionContext<'_> {
    /// The absolute difference (meters) between the routed
    /// and the great circle distance.
    #[inline]
    pub fn mismatch(&self) -> f64 {
        (self.route.distance() - self.great_circle).abs()
    }

    /// The average speed (m/s) implied by travelling the route in the
    /// time elapsed between the observations. Unknown where either
    /// observation is untimed, or no time elapsed.
    pub fn implied_speed(&self) -> Option<f64> {
        self.elapsed
            .filter(|elapsed| *elapsed > 0.0)
            .map(|elapsed| self.route.distance() / elapsed)
    }

    /// Whether any part of the route travels a direction its access forbids.
    pub fn violates_access(&self) -> bool {
        self.route.path.iter().any(|traversal| !traversal.allowed())
    }
}
