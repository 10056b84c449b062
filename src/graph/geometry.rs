//! Haversine measurement utilities over edge geometries.

use geo::{Coord, Distance, Haversine, LineString, Point};

/// Length of a line in meters.
pub fn haversine_length(line: &LineString) -> f64 {
    line.0
        .windows(2)
        .map(|pair| Haversine.distance(Point(pair[0]), Point(pair[1])))
        .sum()
}

/// The distance (meters) from the start of the line to each of its vertices.
pub fn cumulative(line: &LineString) -> Vec<f64> {
    let mut total = 0.0;
    let mut distances = Vec::with_capacity(line.0.len());

    for (index, coord) in line.0.iter().enumerate() {
        if index > 0 {
            total += Haversine.distance(Point(line.0[index - 1]), Point(*coord));
        }
        distances.push(total);
    }

    distances
}

fn interpolate(a: Coord, b: Coord, ratio: f64) -> Coord {
    a + (b - a) * ratio
}

/// The position at `fraction` of the line's length.
pub fn point_at(line: &LineString, fraction: f64) -> Option<Point> {
    let distances = cumulative(line);
    let total = *distances.last()?;
    let target = fraction.clamp(0.0, 1.0) * total;

    position_along(line, &distances, target).map(|(coord, _)| Point(coord))
}

/// Locates the coordinate `target` meters along the line, along
/// with the index of the segment it falls upon.
fn position_along(line: &LineString, distances: &[f64], target: f64) -> Option<(Coord, usize)> {
    let last = line.0.len().checked_sub(1)?;
    if last == 0 {
        return line.0.first().map(|coord| (*coord, 0));
    }

    let segment = distances
        .windows(2)
        .position(|pair| target <= pair[1])
        .unwrap_or(last - 1);

    let span = distances[segment + 1] - distances[segment];
    let ratio = if span > 0.0 {
        ((target - distances[segment]) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some((
        interpolate(line.0[segment], line.0[segment + 1], ratio),
        segment,
    ))
}

/// The part of the line between two fractions of its length, `from <= to`.
pub fn cut(line: &LineString, from: f64, to: f64) -> LineString {
    let distances = cumulative(line);
    let Some(total) = distances.last().copied() else {
        return LineString::new(vec![]);
    };

    let (from, to) = (from.clamp(0.0, 1.0) * total, to.clamp(0.0, 1.0) * total);
    let (Some((start, first)), Some((end, last))) = (
        position_along(line, &distances, from),
        position_along(line, &distances, to),
    ) else {
        return LineString::new(vec![]);
    };

    let mut coords = Vec::with_capacity(last - first + 2);
    coords.push(start);
    coords.extend(
        (first + 1..=last)
            .filter(|index| distances[*index] > from && distances[*index] < to)
            .map(|index| line.0[index]),
    );
    coords.push(end);

    LineString::new(coords)
}
