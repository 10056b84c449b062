use crate::error::GraphError;
use crate::fixtures::{self, HUNDREDTH_DEGREE};
use crate::graph::{Access, EdgeId, GraphBuilder, NodeId, RoadGraph, Speed};
use crate::overlay::{EdgeOrigin, QueryOverlay};
use crate::snap::{Scan, Snap, Snapper};

use approx::assert_relative_eq;
use geo::{point, Point};

fn snap_at<G: RoadGraph + Scan>(graph: &G, point: Point) -> Result<Snap, GraphError> {
    let snaps = Snapper::new(graph, graph).snap(&point, 50.0)?;
    Ok(snaps[0])
}

#[test]
fn interior_snap_splits_the_edge() -> Result<(), GraphError> {
    let graph = fixtures::straight();
    let snap = snap_at(&graph, point! { x: 0.0025, y: 0.0 })?;

    let (overlay, nodes) = QueryOverlay::materialize(&graph, &[snap])?;

    assert_eq!(nodes, vec![NodeId::new(2)]);
    assert!(overlay.is_virtual_node(nodes[0]));
    assert_eq!(overlay.node_count(), 3);
    assert_eq!(overlay.edge_count(), 3);
    assert!(overlay.is_hidden(EdgeId::new(0)));

    // Both halves, pro-rated.
    let adjacent = overlay.edges_of(nodes[0])?;
    assert_eq!(adjacent.len(), 2);

    let mut lengths = adjacent.iter().map(|t| t.edge.length).collect::<Vec<_>>();
    lengths.sort_by(f64::total_cmp);
    assert_relative_eq!(lengths[0], 0.25 * HUNDREDTH_DEGREE, max_relative = 0.001);
    assert_relative_eq!(lengths[1], 0.75 * HUNDREDTH_DEGREE, max_relative = 0.001);

    // The real node no longer sees the hidden base edge.
    let from_base = overlay.edges_of(NodeId::new(0))?;
    assert_eq!(from_base.len(), 1);
    assert_eq!(from_base[0].to(), nodes[0]);
    assert_eq!(overlay.origin(from_base[0].edge.id), EdgeId::new(0));

    Ok(())
}

#[test]
fn same_position_shares_one_node() -> Result<(), GraphError> {
    let graph = fixtures::straight();
    let snap = snap_at(&graph, point! { x: 0.004, y: 0.0001 })?;

    let (overlay, nodes) = QueryOverlay::materialize(&graph, &[snap, snap])?;

    assert_eq!(nodes[0], nodes[1]);
    assert_eq!(overlay.virtual_node_count(), 1);
    assert_eq!(overlay.virtual_edge_count(), 2);
    assert_eq!(overlay.locate(&snap)?, nodes[0]);

    Ok(())
}

#[test]
fn splits_are_chained_by_offset() -> Result<(), GraphError> {
    let graph = fixtures::straight();
    let snaps = [
        snap_at(&graph, point! { x: 0.009, y: 0.0 })?,
        snap_at(&graph, point! { x: 0.001, y: 0.0 })?,
        snap_at(&graph, point! { x: 0.005, y: 0.0 })?,
    ];

    let (overlay, nodes) = QueryOverlay::materialize(&graph, &snaps)?;
    assert_eq!(overlay.virtual_edge_count(), 4);

    // Allocated in increasing offset along the edge.
    assert_eq!(nodes, vec![NodeId::new(4), NodeId::new(2), NodeId::new(3)]);

    let origins = (1..5)
        .map(|id| overlay.resolve(EdgeId::new(id)))
        .collect::<Result<Vec<_>, _>>()?;

    let expected = [(0.0, 0.1), (0.1, 0.5), (0.5, 0.9), (0.9, 1.0)];
    for (origin, (from, to)) in origins.iter().zip(expected) {
        assert_eq!(origin.edge, EdgeId::new(0));
        assert_relative_eq!(origin.from_offset, from, epsilon = 1e-6);
        assert_relative_eq!(origin.to_offset, to, epsilon = 1e-6);
    }

    let total = (1..5)
        .map(|id| overlay.length_of(EdgeId::new(id)))
        .sum::<Result<f64, _>>()?;
    assert_relative_eq!(total, graph.length_of(EdgeId::new(0))?, max_relative = 1e-9);

    Ok(())
}

#[test]
fn tower_snaps_reuse_real_nodes() -> Result<(), GraphError> {
    let graph = fixtures::straight();
    let snap = snap_at(&graph, point! { x: 0.01, y: 0.0 })?;

    let (overlay, nodes) = QueryOverlay::materialize(&graph, &[snap])?;

    assert_eq!(nodes, vec![NodeId::new(1)]);
    assert_eq!(overlay.virtual_node_count(), 0);
    assert!(!overlay.is_hidden(EdgeId::new(0)));
    assert_eq!(
        overlay.resolve(EdgeId::new(0))?,
        EdgeOrigin {
            edge: EdgeId::new(0),
            from_offset: 0.0,
            to_offset: 1.0
        }
    );

    Ok(())
}

#[test]
fn pillar_is_promoted() -> Result<(), GraphError> {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(point! { x: 0.0, y: 0.0 });
    let b = builder.add_node(point! { x: 0.02, y: 0.0 });
    builder.add_edge(a, b, &[point! { x: 0.01, y: 0.0 }], Access::ONE_WAY, Speed::default())?;
    let graph = builder.build();

    let snap = snap_at(&graph, point! { x: 0.01, y: 0.0001 })?;
    let (overlay, nodes) = QueryOverlay::materialize(&graph, &[snap])?;

    assert!(overlay.is_virtual_node(nodes[0]));
    assert_relative_eq!(overlay.node_position(nodes[0])?.x(), 0.01);

    // Direction and access are preserved along the chain.
    let departing = overlay.edges_of(nodes[0])?;
    assert_eq!(departing.len(), 2);
    for traversal in departing {
        assert_eq!(traversal.edge.access, Access::ONE_WAY);
        assert_eq!(traversal.allowed(), traversal.to() == b);
    }

    Ok(())
}

#[test]
fn base_graph_is_untouched() -> Result<(), GraphError> {
    let graph = fixtures::straight();
    let snap = snap_at(&graph, point! { x: 0.005, y: 0.0 })?;

    {
        let _overlay = QueryOverlay::materialize(&graph, &[snap])?;
    }

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edges_of(NodeId::new(0))?.len(), 1);
    assert!(matches!(
        graph.node_position(NodeId::new(2)),
        Err(GraphError::MissingNode(_))
    ));

    Ok(())
}
