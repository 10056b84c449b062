use crate::graph::{EdgeId, Graph};
use crate::snap::{distance_rank, Proximity};

use geo::{Destination, Distance, Geodesic, Haversine, LineLocatePoint, Point};
use rstar::AABB;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
#[cfg(feature = "tracing")]
use tracing::Level;

/// Spatial index query contract.
pub trait Scan: Sync {
    /// Every edge with some position within `radius` meters of `point`,
    /// each reported once at its nearest position, ordered by
    /// increasing [`distance_rank`] and then by edge id.
    fn nearest(&self, point: &Point, radius: f64) -> Vec<Proximity>;
}

impl Scan for Graph {
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip(self)))]
    fn nearest(&self, point: &Point, radius: f64) -> Vec<Proximity> {
        // The diagonal of a square whose inner circle has the radius.
        let reach = radius * std::f64::consts::SQRT_2;
        let bottom_right = Geodesic.destination(*point, 135.0, reach);
        let top_left = Geodesic.destination(*point, 315.0, reach);

        let bbox = AABB::from_corners(top_left, bottom_right);
        let mut nearest: FxHashMap<EdgeId, Proximity> = FxHashMap::default();

        for entry in self.index().locate_in_envelope_intersecting(&bbox) {
            let line = entry.line;

            // We locate the point upon the segment,
            // and then project that fractional (%)
            // upon the segment to obtain a point
            let Some(fraction) = line
                .line_locate_point(point)
                .filter(|fraction| fraction.is_finite())
            else {
                continue;
            };

            let projected = Point(line.start + line.delta() * fraction);
            let distance = Haversine.distance(*point, projected);
            if distance > radius {
                continue;
            }

            let proximity = Proximity {
                edge: entry.edge,
                offset: entry.start_offset + Haversine.distance(line.start_point(), projected),
                distance,
                point: projected,
            };

            match nearest.entry(entry.edge) {
                Entry::Vacant(vacant) => {
                    vacant.insert(proximity);
                }
                Entry::Occupied(mut occupied) => {
                    let current = occupied.get();
                    let closer = distance
                        .total_cmp(&current.distance)
                        .then(proximity.offset.total_cmp(&current.offset))
                        .is_lt();

                    if closer {
                        occupied.insert(proximity);
                    }
                }
            }
        }

        let mut proximities = nearest.into_values().collect::<Vec<_>>();
        proximities.sort_by_key(|proximity| (distance_rank(proximity.distance), proximity.edge));
        proximities
    }
}
