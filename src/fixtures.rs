//! Synthetic road networks placed on the equator, where a
//! thousandth of a degree spans roughly 111 meters.

use crate::graph::{Access, EdgeId, Graph, GraphBuilder, NodeId, Speed};
use crate::matcher::Observation;

use chrono::{DateTime, Duration, TimeZone, Utc};
use geo::{point, Point};

/// Length (meters) of a 0.01 degree edge along the equator.
pub const HUNDREDTH_DEGREE: f64 = 1111.95;

/// A single straight two-way edge from (0, 0) to (0.01, 0).
pub fn straight() -> Graph {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });
    let b = builder.add_node(point! { x: 0.01, y: 0.0 });
    builder.add_road(a, b).expect("nodes exist");
    builder.build()
}

/// A single one-way edge from (0, 0) to (0.01, 0).
pub fn one_way() -> Graph {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });
    let b = builder.add_node(point! { x: 0.01, y: 0.0 });
    builder
        .add_edge(a, b, &[], Access::ONE_WAY, Speed::default())
        .expect("nodes exist");
    builder.build()
}

/// A `size` by `size` lattice of two-way edges spaced `step` degrees apart.
/// The node at column `x`, row `y` has id `y * size + x`.
pub fn grid(size: u32, step: f64) -> Graph {
    let mut builder = GraphBuilder::new();

    for y in 0..size {
        for x in 0..size {
            builder.add_node(point! { x: x as f64 * step, y: y as f64 * step });
        }
    }

    let id = |x: u32, y: u32| NodeId::new(y * size + x);
    for y in 0..size {
        for x in 0..size {
            if x + 1 < size {
                builder.add_road(id(x, y), id(x + 1, y)).expect("nodes exist");
            }
            if y + 1 < size {
                builder.add_road(id(x, y), id(x, y + 1)).expect("nodes exist");
            }
        }
    }

    builder.build()
}

/// Two roads joining at a right angle in node 1:
/// (0, 0) -e0- (0.01, 0) -e1- (0.01, 0.01)
pub fn corner() -> (Graph, [EdgeId; 2]) {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });
    let b = builder.add_node(point! { x: 0.01, y: 0.0 });
    let c = builder.add_node(point! { x: 0.01, y: 0.01 });
    let first = builder.add_road(a, b).expect("nodes exist");
    let second = builder.add_road(b, c).expect("nodes exist");
    (builder.build(), [first, second])
}

pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp")
}

pub fn untimed(points: &[Point]) -> Vec<Observation> {
    points.iter().copied().map(Observation::new).collect()
}

/// Observations spaced `interval` seconds apart.
pub fn timed(points: &[Point], interval: i64) -> Vec<Observation> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            Observation::at(*point, epoch() + Duration::seconds(interval * index as i64))
        })
        .collect()
}
