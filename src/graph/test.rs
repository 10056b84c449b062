use crate::error::GraphError;
use crate::fixtures::{self, HUNDREDTH_DEGREE};
use crate::graph::geometry::{cumulative, cut, haversine_length, point_at};
use crate::graph::{Access, EdgeId, GraphBuilder, NodeId, RoadGraph, Speed};

use approx::assert_relative_eq;
use geo::{point, wkt};

#[test]
fn edge_length_follows_pillars() -> Result<(), GraphError> {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });
    let b = builder.add_node(point! { x: 0.01, y: 0.0 });

    let straight = builder.add_road(a, b)?;
    let detour = builder.add_edge(
        a,
        b,
        &[point! { x: 0.005, y: 0.005 }],
        Access::BOTH,
        Speed::default(),
    )?;

    let graph = builder.build();

    assert_relative_eq!(graph.length_of(straight)?, HUNDREDTH_DEGREE, max_relative = 0.001);
    assert!(graph.length_of(detour)? > graph.length_of(straight)?);
    assert_eq!(graph.geometry(detour)?.0.len(), 3);

    Ok(())
}

#[test]
fn adjacency_is_oriented_from_the_node() -> Result<(), GraphError> {
    let graph = fixtures::grid(3, 0.001);
    let centre = NodeId::new(4);

    let adjacent = graph.edges_of(centre)?;
    assert_eq!(adjacent.len(), 4);
    assert!(adjacent.iter().all(|traversal| traversal.from() == centre));

    let mut neighbours = adjacent.iter().map(|t| t.to().0).collect::<Vec<_>>();
    neighbours.sort();
    assert_eq!(neighbours, vec![1, 3, 5, 7]);

    Ok(())
}

#[test]
fn missing_references_are_reported() {
    let graph = fixtures::straight();

    assert_eq!(
        graph.edge(EdgeId::new(7)),
        Err(GraphError::MissingEdge(EdgeId::new(7)))
    );
    assert_eq!(
        graph.edges_of(NodeId::new(2)).map(|adjacent| adjacent.len()),
        Err(GraphError::MissingNode(NodeId::new(2)))
    );
}

#[test]
fn self_loops_are_rejected() {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });

    assert_eq!(
        builder.add_road(a, a),
        Err(GraphError::DegenerateGeometry(EdgeId::new(0)))
    );
}

#[test]
fn one_way_access() -> Result<(), GraphError> {
    let graph = fixtures::one_way();

    assert!(graph.access_allowed(EdgeId::new(0), false)?);
    assert!(!graph.access_allowed(EdgeId::new(0), true)?);
    assert_eq!(
        graph.endpoints_of(EdgeId::new(0))?,
        (NodeId::new(0), NodeId::new(1))
    );

    Ok(())
}

#[test]
fn cut_keeps_interior_vertices() {
    let line = wkt! { LINESTRING(0.0 0.0, 0.01 0.0, 0.02 0.0) };

    let distances = cumulative(&line);
    assert_relative_eq!(distances[2], haversine_length(&line));

    let part = cut(&line, 0.25, 0.75);
    assert_eq!(part.0.len(), 3);
    assert_relative_eq!(part.0[0].x, 0.005, epsilon = 1e-9);
    assert_relative_eq!(part.0[1].x, 0.01, epsilon = 1e-9);
    assert_relative_eq!(part.0[2].x, 0.015, epsilon = 1e-9);

    let head = cut(&line, 0.0, 0.1);
    assert_eq!(head.0.len(), 2);
    assert_relative_eq!(head.0[1].x, 0.002, epsilon = 1e-9);
}

#[test]
fn point_at_fraction() {
    let line = wkt! { LINESTRING(0.0 0.0, 0.01 0.0) };
    let middle = point_at(&line, 0.5).expect("line is not empty");

    assert_relative_eq!(middle.x(), 0.005, epsilon = 1e-9);
    assert_relative_eq!(middle.y(), 0.0, epsilon = 1e-9);
}
