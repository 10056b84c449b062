use pathfinding::num_traits::Zero;
use std::cmp::Ordering;
use std::ops::Add;

/// The accumulated cost of a route.
///
/// Ordered by weight, with ties broken by distance and then time,
/// so that routes of equal weight are chosen deterministically.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteCost {
    /// Accumulated weighting cost, including turn costs.
    pub weight: f64,
    /// Accumulated length in meters.
    pub distance: f64,
    /// Accumulated edge and turn travel time.
    pub millis: i64,
}

impl RouteCost {
    pub fn new(weight: f64, distance: f64, millis: i64) -> Self {
        Self {
            weight,
            distance,
            millis,
        }
    }
}

impl Eq for RouteCost {}

impl PartialOrd for RouteCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RouteCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.distance.total_cmp(&other.distance))
            .then_with(|| self.millis.cmp(&other.millis))
    }
}

impl Add for RouteCost {
    type Output = RouteCost;

    fn add(self, rhs: Self) -> Self::Output {
        RouteCost {
            weight: self.weight + rhs.weight,
            distance: self.distance + rhs.distance,
            millis: self.millis + rhs.millis,
        }
    }
}

impl Zero for RouteCost {
    fn zero() -> Self {
        RouteCost::default()
    }

    fn is_zero(&self) -> bool {
        self.weight == 0.0 && self.distance == 0.0 && self.millis == 0
    }
}
