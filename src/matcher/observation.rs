use chrono::{DateTime, Utc};
use geo::Point;

/// A single raw GPS fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub point: Point,
    pub time: Option<DateTime<Utc>>,
}

impl Observation {
    /// An observation without a timestamp.
    pub fn new(point: Point) -> Self {
        Self { point, time: None }
    }

    pub fn at(point: Point, time: DateTime<Utc>) -> Self {
        Self {
            point,
            time: Some(time),
        }
    }

    /// Seconds elapsed from this observation until `other`,
    /// where both carry a timestamp.
    #[inline]
    pub fn elapsed_until(&self, other: &Observation) -> Option<f64> {
        let (from, to) = (self.time?, other.time?);
        Some((to - from).num_milliseconds() as f64 / 1_000.0)
    }
}

impl From<Point> for Observation {
    fn from(point: Point) -> Self {
        Observation::new(point)
    }
}
