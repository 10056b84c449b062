use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::fixtures::{self, HUNDREDTH_DEGREE};
use crate::graph::{Access, EdgeId, EdgeState, NodeId, Speed, Traversal};
use crate::matcher::Observation;
use crate::overlay::QueryOverlay;
use crate::route::{Route, RouteCost};
use crate::snap::{Snap, SnapPosition, Snapper};
use crate::transition::*;
use crate::weighting::DistanceWeighting;

use approx::assert_relative_eq;
use geo::{point, Point};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

fn snap(distance: f64, position: SnapPosition) -> Snap {
    Snap {
        edge: EdgeId::new(0),
        position,
        offset: 0.5,
        point: point! { x: 0.0, y: 0.0 },
        distance,
        closest_node: (position == SnapPosition::Tower).then_some(NodeId::new(0)),
        pillar: None,
    }
}

fn candidate(snap: Snap) -> Candidate {
    Candidate {
        observation: 0,
        snap,
        node: NodeId::new(0),
        emission: 0.0,
    }
}

fn route(distance: f64, path: Vec<Traversal>) -> Route {
    Route {
        cost: RouteCost::new(distance, distance, 0),
        path,
    }
}

/// Builds the trellis of `observations` upon the straight fixture.
fn trellis_of(
    observations: &[Observation],
    config: &MatchConfig,
    cancellation: &Cancellation,
) -> Result<Trellis, MatchError> {
    let graph = fixtures::straight();
    let costing: CostingStrategies<GaussianEmission, ExponentialTransition> =
        CostingStrategies::from_config(config);
    let snapper = Snapper::new(&graph, &graph);

    let snaps = observations
        .iter()
        .map(|observation| snapper.snap(&observation.point, config.search_radius))
        .collect::<Result<Vec<_>, _>>()?;

    let (overlay, nodes) = QueryOverlay::materialize(&graph, &snaps.concat())?;

    let mut start = 0;
    let layers = snaps
        .iter()
        .zip(observations)
        .enumerate()
        .map(|(index, (snaps, observation))| {
            let nodes = &nodes[start..start + snaps.len()];
            start += snaps.len();
            Layer::new(index, *observation, snaps, nodes, &costing)
        })
        .collect();

    Trellis::build(
        &overlay,
        &DistanceWeighting::new(),
        &costing,
        config,
        layers,
        cancellation,
    )
}

fn along(xs: &[f64]) -> Vec<Point> {
    xs.iter().map(|x| point! { x: *x, y: 0.00005 }).collect()
}

#[test]
fn emission_is_gaussian_in_snap_distance() {
    let strategy = GaussianEmission {
        sigma: 10.0,
        tower_bias: 0.0,
    };
    let origin = point! { x: 0.0, y: 0.0 };

    let on_road = snap(0.0, SnapPosition::EdgeInterior);
    let one_sigma = snap(10.0, SnapPosition::EdgeInterior);
    let two_sigma = snap(20.0, SnapPosition::EdgeInterior);

    assert_eq!(strategy.log_probability(EmissionContext::new(&on_road, &origin)), 0.0);
    assert_relative_eq!(
        strategy.log_probability(EmissionContext::new(&one_sigma, &origin)),
        -0.5
    );
    assert_relative_eq!(
        strategy.log_probability(EmissionContext::new(&two_sigma, &origin)),
        -2.0
    );
}

#[test]
fn tower_bias_penalises_tower_snaps_only() {
    let strategy = GaussianEmission {
        sigma: 10.0,
        tower_bias: 0.25,
    };
    let origin = point! { x: 0.0, y: 0.0 };

    let tower = snap(10.0, SnapPosition::Tower);
    let pillar = snap(10.0, SnapPosition::Pillar);

    assert_relative_eq!(
        strategy.log_probability(EmissionContext::new(&tower, &origin)),
        -0.75
    );
    assert_relative_eq!(
        strategy.log_probability(EmissionContext::new(&pillar, &origin)),
        -0.5
    );
}

#[test]
fn transition_is_exponential_in_mismatch() {
    let strategy = ExponentialTransition {
        beta: 2.0,
        max_speed: 60.0,
    };

    let candidate = candidate(snap(0.0, SnapPosition::EdgeInterior));
    let route = route(110.0, vec![]);

    let context = |great_circle: f64, elapsed: Option<f64>| TransitionContext {
        route: &route,
        source_candidate: &candidate,
        target_candidate: &candidate,
        great_circle,
        elapsed,
    };

    assert_eq!(strategy.log_probability(context(110.0, None)), 0.0);
    assert_relative_eq!(strategy.log_probability(context(100.0, None)), -5.0);
    assert_relative_eq!(strategy.log_probability(context(120.0, None)), -5.0);

    // 110 meters within a single second.
    assert_eq!(
        strategy.log_probability(context(110.0, Some(1.0))),
        f64::NEG_INFINITY
    );
    assert_eq!(strategy.log_probability(context(110.0, Some(10.0))), 0.0);

    // Speeds are unknown where no time has passed.
    assert_eq!(strategy.log_probability(context(110.0, Some(0.0))), 0.0);
}

#[test]
fn transition_against_access_is_excluded() {
    let strategy = ExponentialTransition::default();
    let candidate = candidate(snap(0.0, SnapPosition::EdgeInterior));

    let edge = EdgeState {
        id: EdgeId::new(0),
        base: NodeId::new(0),
        adj: NodeId::new(1),
        length: 100.0,
        access: Access::ONE_WAY,
        speed: Speed::default(),
    };

    let forward = route(100.0, vec![Traversal::new(edge, false)]);
    let backward = route(100.0, vec![Traversal::new(edge, true)]);

    let context = |route| TransitionContext {
        route,
        source_candidate: &candidate,
        target_candidate: &candidate,
        great_circle: 100.0,
        elapsed: None,
    };

    assert!(strategy.calculate(context(&forward)).is_some());
    assert!(strategy.calculate(context(&backward)).is_none());
}

#[test]
fn strategies_follow_configuration() {
    let config = MatchConfig {
        measurement_error_sigma: 4.0,
        transition_beta: 8.0,
        max_transition_speed: 30.0,
        tower_snap_bias: 1.0,
        ..MatchConfig::default()
    };

    let emission = GaussianEmission::from(&config);
    let transition = ExponentialTransition::from(&config);

    assert_eq!((emission.sigma, emission.tower_bias), (4.0, 1.0));
    assert_eq!((transition.beta, transition.max_speed), (8.0, 30.0));

    let costing: CostingStrategies<GaussianEmission, ExponentialTransition> =
        CostingStrategies::from_config(&config);
    let origin = point! { x: 0.0, y: 0.0 };
    let snap = snap(4.0, SnapPosition::EdgeInterior);
    assert_relative_eq!(costing.emission(EmissionContext::new(&snap, &origin)), -0.5);
}

#[test]
fn layer_scores_every_snap() {
    let costing: CostingStrategies<GaussianEmission, ExponentialTransition> =
        CostingStrategies::default();
    let origin = Observation::new(point! { x: 0.0, y: 0.0 });
    let snaps = [
        snap(0.0, SnapPosition::EdgeInterior),
        snap(50.0, SnapPosition::EdgeInterior),
    ];
    let nodes = [NodeId::new(7), NodeId::new(8)];

    let layer = Layer::new(3, origin, &snaps, &nodes, &costing);

    assert_eq!(layer.observation, 3);
    assert_eq!(layer.candidates.len(), 2);
    assert!(layer.candidates.iter().all(|candidate| candidate.observation == 3));
    assert_eq!(layer.candidates[1].node, NodeId::new(8));
    assert_eq!(layer.candidates[0].emission, 0.0);
    assert_relative_eq!(layer.candidates[1].emission, -0.5);
}

#[test]
fn layers_collect_in_order() {
    let costing: CostingStrategies<GaussianEmission, ExponentialTransition> =
        CostingStrategies::default();
    let snaps = [snap(0.0, SnapPosition::EdgeInterior)];
    let nodes = [NodeId::new(0)];

    let Layers { layers } = (0..16usize)
        .into_par_iter()
        .map(|index| {
            let origin = Observation::new(point! { x: index as f64 * 0.001, y: 0.0 });
            Layer::new(index, origin, &snaps, &nodes, &costing)
        })
        .collect();

    assert_eq!(
        layers.iter().map(|layer| layer.observation).collect::<Vec<_>>(),
        (0..16).collect::<Vec<_>>()
    );
}

#[test_log::test]
fn trellis_routes_between_layers() -> Result<(), MatchError> {
    let observations = fixtures::untimed(&along(&[0.002, 0.006, 0.008]));
    let trellis = trellis_of(&observations, &MatchConfig::default(), &Cancellation::new())?;

    assert_eq!(trellis.layers.len(), 3);
    assert_eq!(trellis.transitions.len(), 2);

    let arc = trellis.transitions[0].get(0, 0).expect("adjacent along the edge");
    assert_relative_eq!(arc.route.distance(), 0.4 * HUNDREDTH_DEGREE, max_relative = 0.001);
    assert!(arc.log_probability > -0.5, "routed as the crow flies");
    assert!(arc.route.path.iter().all(|traversal| !traversal.reverse));

    assert_eq!(trellis.transitions[1].permitted(), 1);
    Ok(())
}

#[test_log::test]
fn trellis_excludes_implausible_speeds() -> Result<(), MatchError> {
    // Roughly 440 meters within a single second.
    let observations = fixtures::timed(&along(&[0.002, 0.006]), 1);
    let trellis = trellis_of(&observations, &MatchConfig::default(), &Cancellation::new())?;

    assert_eq!(trellis.transitions[0].permitted(), 0);
    assert_eq!(trellis.transitions[0].log_probability(0, 0), f64::NEG_INFINITY);

    let observations = fixtures::timed(&along(&[0.002, 0.006]), 60);
    let trellis = trellis_of(&observations, &MatchConfig::default(), &Cancellation::new())?;
    assert_eq!(trellis.transitions[0].permitted(), 1);

    Ok(())
}

#[test]
fn cancelled_trellis_is_not_built() {
    let observations = fixtures::untimed(&along(&[0.002, 0.006]));
    let cancellation = Cancellation::new();
    cancellation.cancel();

    let trellis = trellis_of(&observations, &MatchConfig::default(), &cancellation);
    assert_eq!(trellis.map(|_| ()), Err(MatchError::Cancelled));
}

#[test]
fn matrix_lookups_outside_bounds_are_excluded() {
    let matrix = TransitionMatrix::new(1, 1, vec![None]);

    assert!(matrix.get(0, 0).is_none());
    assert!(matrix.get(1, 0).is_none());
    assert!(matrix.get(0, 1).is_none());
    assert_eq!(matrix.log_probability(3, 3), f64::NEG_INFINITY);
}
