// Tests for identity-based edge inference

use kinmap_core::edges::{JoinStrategy, KeyedJoin, PairJoin, PairwiseJoin, build_edges};
use kinmap_core::model::DEFAULT_DATASET;
use kinmap_core::record::{Coordinate, Event, IdentityKey, ParseOptions, parse_events};

fn event(lat: f64, lon: f64, name: &str, year: i32, weight: f64) -> Event {
    Event {
        coordinate: Coordinate::new(lat, lon),
        year,
        identity: IdentityKey {
            name: name.to_string(),
            year,
        },
        title: format!("{} {} @{}", name, year, lat),
        weight,
        line: 0,
    }
}

// ============================================================================
// Pair generation
// ============================================================================

#[test]
fn test_pairwise_upper_triangle_only() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.0),
        event(3.0, 3.0, "a", 1900, 0.0),
    ];
    let pairs = PairwiseJoin.matching_pairs(&events);
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
}

#[test]
fn test_pairs_need_matching_identity() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1901, 0.0),
        event(3.0, 3.0, "b", 1900, 0.0),
    ];
    assert!(PairwiseJoin.matching_pairs(&events).is_empty());
    assert!(KeyedJoin.matching_pairs(&events).is_empty());
}

#[test]
fn test_keyed_join_matches_pairwise_order() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "b", 1900, 0.0),
        event(3.0, 3.0, "a", 1900, 0.0),
        event(4.0, 4.0, "b", 1900, 0.0),
        event(5.0, 5.0, "a", 1900, 0.0),
    ];
    let pairwise = PairwiseJoin.matching_pairs(&events);
    let keyed = KeyedJoin.matching_pairs(&events);
    assert_eq!(pairwise, vec![(0, 2), (0, 4), (1, 3), (2, 4)]);
    assert_eq!(keyed, pairwise);
}

#[test]
fn test_join_strategy_from_str() {
    assert_eq!(JoinStrategy::from_str("pairwise"), Some(JoinStrategy::Pairwise));
    assert_eq!(JoinStrategy::from_str("KEYED"), Some(JoinStrategy::Keyed));
    assert_eq!(JoinStrategy::from_str("hash"), Some(JoinStrategy::Keyed));
    assert_eq!(JoinStrategy::from_str("spatial"), None);
    assert_eq!(JoinStrategy::Keyed.as_str(), "keyed");
}

// ============================================================================
// Edge building
// ============================================================================

#[test]
fn test_same_identity_different_places_gives_one_edge() {
    let text = "Town\t1.0\t2.0\t1900\tAlice\tborn\n\
                Region\t3.0\t4.0\t1900\tAlice\tregister\n\
                Elsewhere\t5.0\t6.0\t2000\tBob";
    let parsed = parse_events(text, &ParseOptions::default()).unwrap();
    let edges = build_edges(&parsed.events, &PairwiseJoin);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source.coordinate, Coordinate::new(2.0, 1.0));
    assert_eq!(edges[0].target.coordinate, Coordinate::new(4.0, 3.0));
    assert_eq!(edges[0].weight(), 0.0);
}

#[test]
fn test_different_identities_give_no_edge() {
    let text = "P1\t1.0\t2.0\t1900\tAlice\nP1\t1.0\t2.0\t1950\tAlice\n";
    let parsed = parse_events(text, &ParseOptions::default()).unwrap();
    assert!(build_edges(&parsed.events, &PairwiseJoin).is_empty());
}

#[test]
fn test_edge_weight_is_max_of_endpoints() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.25),
        event(2.0, 2.0, "a", 1900, 0.75),
    ];
    let edges = build_edges(&events, &PairwiseJoin);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source.weight, 0.25);
    assert_eq!(edges[0].target.weight, 0.75);
    assert_eq!(edges[0].weight(), 0.75);
}

#[test]
fn test_no_edge_within_one_coordinate() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(1.0, 1.0, "a", 1900, 0.0),
    ];
    assert!(build_edges(&events, &PairwiseJoin).is_empty());
}

#[test]
fn test_three_places_give_three_edges() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.0),
        event(3.0, 3.0, "a", 1900, 0.0),
    ];
    let edges = build_edges(&events, &PairwiseJoin);
    assert_eq!(edges.len(), 3);
    for edge in &edges {
        assert_ne!(edge.source.coordinate, edge.target.coordinate);
    }
}

#[test]
fn test_pairs_between_same_places_merge() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.2),
        event(1.0, 1.0, "b", 1950, 0.5),
        event(2.0, 2.0, "b", 1950, 0.5),
    ];
    let edges = build_edges(&events, &PairwiseJoin);

    assert_eq!(edges.len(), 1);
    let edge = &edges[0];
    assert_eq!(edge.source.title, "a 1900 @1\nb 1950 @1");
    assert_eq!(edge.target.title, "a 1900 @2\nb 1950 @2");
    assert_eq!(edge.source.event_count, 2);
    assert_eq!(edge.source.weight, 0.0);
    assert_eq!(edge.target.weight, 0.2);
    assert_eq!(edge.weight(), 0.2);
    assert_eq!(
        edge.title(),
        "a 1900 @1\nb 1950 @1\na 1900 @2\nb 1950 @2"
    );
}

#[test]
fn test_endpoint_lists_each_event_once() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.0),
    ];
    let edges = build_edges(&events, &PairwiseJoin);

    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source.event_count, 1);
    assert_eq!(edges[0].target.event_count, 2);
}

#[test]
fn test_direction_follows_event_order() {
    let events = vec![
        event(1.0, 1.0, "a", 1900, 0.0),
        event(2.0, 2.0, "a", 1900, 0.0),
        event(2.0, 2.0, "b", 1900, 0.0),
        event(1.0, 1.0, "b", 1900, 0.0),
    ];
    let edges = build_edges(&events, &PairwiseJoin);

    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].source.coordinate, Coordinate::new(1.0, 1.0));
    assert_eq!(edges[1].source.coordinate, Coordinate::new(2.0, 2.0));
}

#[test]
fn test_strategies_build_identical_edges() {
    let parsed = parse_events(DEFAULT_DATASET, &ParseOptions::default()).unwrap();
    let pairwise = build_edges(&parsed.events, &JoinStrategy::Pairwise);
    let keyed = build_edges(&parsed.events, &JoinStrategy::Keyed);

    assert_eq!(pairwise.len(), 3);
    assert_eq!(pairwise, keyed);
}

#[test]
fn test_no_events_no_edges() {
    assert!(build_edges(&[], &KeyedJoin).is_empty());
}
