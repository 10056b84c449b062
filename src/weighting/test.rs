use crate::graph::{Access, EdgeId, EdgeState, NodeId, Speed};
use crate::weighting::*;

use approx::assert_relative_eq;

fn edge(length: f64, access: Access, speed: Speed) -> EdgeState {
    EdgeState {
        id: EdgeId::new(0),
        base: NodeId::new(0),
        adj: NodeId::new(1),
        length,
        access,
        speed,
    }
}

#[test]
fn distance_costs_the_length() {
    let weighting = DistanceWeighting::new();
    let road = edge(1000.0, Access::BOTH, Speed::default());

    assert_eq!(weighting.edge_cost(&road, false), 1000.0);
    assert_eq!(weighting.edge_cost(&road, true), 1000.0);
    // 1km at 60km/h
    assert_eq!(weighting.edge_millis(&road, false), 60_000);
    assert_eq!(weighting.min_weight(250.0), 250.0);
    assert!(!weighting.has_turn_costs());
}

#[test]
fn zero_length_is_free() {
    let road = edge(0.0, Access::BOTH, Speed::default());

    assert_eq!(DistanceWeighting::new().edge_cost(&road, false), 0.0);
    assert_eq!(FastestWeighting::default().edge_cost(&road, false), 0.0);
    assert_eq!(FastestWeighting::default().edge_millis(&road, false), 0);
}

#[test]
fn blocked_direction_short_circuits() {
    let road = edge(1000.0, Access::ONE_WAY, Speed::default());

    for weighting in [WeightingKind::Distance.build(), WeightingKind::Fastest.build()] {
        assert!(!weighting.edge_blocked(&road, false));
        assert!(weighting.edge_blocked(&road, true));
        assert_eq!(weighting.edge_cost(&road, true), f64::INFINITY);
        assert_eq!(weighting.edge_millis(&road, true), 0);
    }
}

#[test]
fn fastest_uses_directional_speed() {
    let weighting = FastestWeighting::new(100.0);
    let road = edge(
        1000.0,
        Access::BOTH,
        Speed {
            forward: 36.0,
            backward: 200.0,
        },
    );

    // 1km at 36km/h (10m/s)
    assert_relative_eq!(weighting.edge_cost(&road, false), 100.0);
    assert_eq!(weighting.edge_millis(&road, false), 100_000);

    // Capped at 100km/h
    assert_relative_eq!(weighting.edge_cost(&road, true), 36.0);
    assert_relative_eq!(weighting.min_weight(1000.0), 36.0);
}

#[test]
fn fastest_blocks_zero_speed() {
    let weighting = FastestWeighting::default();
    let road = edge(
        1000.0,
        Access::BOTH,
        Speed {
            forward: 50.0,
            backward: 0.0,
        },
    );

    assert!(!weighting.edge_blocked(&road, false));
    assert!(weighting.edge_blocked(&road, true));
}

#[test]
fn turn_cost_table() {
    let (a, b, c) = (EdgeId::new(0), EdgeId::new(1), EdgeId::new(2));
    let via = NodeId::new(5);

    let table = TurnCostTable::new()
        .restrict(a, via, b)
        .with_cost(a, via, c, 12.0, 4000)
        .with_u_turn_cost(40.0, 20_000);

    let weighting = DistanceWeighting::with_turn_costs(table);
    assert!(weighting.has_turn_costs());

    assert_eq!(weighting.turn_cost(a, via, b), f64::INFINITY);
    assert_eq!(weighting.turn_cost(a, via, c), 12.0);
    assert_eq!(weighting.turn_millis(a, via, c), 4000);
    assert_eq!(weighting.turn_cost(b, via, c), 0.0);
    assert_eq!(weighting.turn_cost(c, via, c), 40.0);
    assert_eq!(weighting.turn_millis(c, via, c), 20_000);
}

#[test]
fn no_turn_cost_is_inactive() {
    let weighting = FastestWeighting::default();
    assert!(!weighting.has_turn_costs());
    assert_eq!(
        weighting.turn_cost(EdgeId::new(0), NodeId::new(0), EdgeId::new(0)),
        0.0
    );
    assert!(!TurnCostTable::new().is_active());
}

#[test]
fn kind_parses_from_name() {
    assert_eq!("distance".parse::<WeightingKind>().ok(), Some(WeightingKind::Distance));
    assert_eq!("fastest".parse::<WeightingKind>().ok(), Some(WeightingKind::Fastest));
    assert!("shortest".parse::<WeightingKind>().is_err());
    assert_eq!(WeightingKind::Fastest.to_string(), "fastest");
}
