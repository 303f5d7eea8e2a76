// Tests for record parsing and year normalization

use kinmap_core::error::{PipelineError, RowErrorKind};
use kinmap_core::record::{
    Coordinate, IdentityKey, ParseOptions, RowPolicy, Warning, parse_events, year_weight,
};
use std::collections::HashSet;

fn strict() -> ParseOptions {
    ParseOptions::default()
}

fn lenient() -> ParseOptions {
    ParseOptions {
        policy: RowPolicy::Lenient,
        ..ParseOptions::default()
    }
}

// ============================================================================
// Well-formed input
// ============================================================================

#[test]
fn test_same_place_different_years() {
    let text = "P1\t1.0\t2.0\t1900\tAlice\nP1\t1.0\t2.0\t1950\tAlice\n";
    let parsed = parse_events(text, &strict()).unwrap();

    assert_eq!(parsed.events.len(), 2);
    assert_eq!(parsed.events[0].year, 1900);
    assert_eq!(parsed.events[1].year, 1950);
    assert_eq!(parsed.events[0].weight, 0.0);
    assert_eq!(parsed.events[1].weight, 1.0);
    assert!(parsed.warnings.is_empty());
    assert!(parsed.skipped.is_empty());
}

#[test]
fn test_longitude_then_latitude_columns() {
    let parsed = parse_events("P1\t1.0\t2.0\t1900\tAlice", &strict()).unwrap();
    let event = &parsed.events[0];
    assert_eq!(event.coordinate.longitude, 1.0);
    assert_eq!(event.coordinate.latitude, 2.0);
}

#[test]
fn test_title_without_optional_columns() {
    let parsed = parse_events("P1\t1.0\t2.0\t1900\tAlice", &strict()).unwrap();
    assert_eq!(parsed.events[0].title, "P1 - Alice - 1900 -  ");
}

#[test]
fn test_title_with_note_and_type() {
    let parsed = parse_events("Bergen\t5.32\t60.39\t1821\tOle\tborn\tbirth", &strict()).unwrap();
    assert_eq!(parsed.events[0].title, "Bergen - Ole - 1821 - born birth");
}

#[test]
fn test_identity_key_is_name_and_year() {
    let parsed = parse_events("P1\t1.0\t2.0\t1900\tAlice", &strict()).unwrap();
    let key = &parsed.events[0].identity;
    assert_eq!(
        key,
        &IdentityKey {
            name: "Alice".to_string(),
            year: 1900
        }
    );
    assert_eq!(key.to_string(), "Alice - 1900");
}

#[test]
fn test_comma_separated_row() {
    let parsed = parse_events("P1,1.0,2.0,1900,Alice", &strict()).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert_eq!(parsed.events[0].identity.name, "Alice");
}

#[test]
fn test_sorted_by_year_with_stable_ties() {
    let text = "X\t0\t0\t1950\tFirst\n\
                Y\t0\t0\t1900\tSecond\n\
                Z\t0\t0\t1950\tThird\n";
    let parsed = parse_events(text, &strict()).unwrap();
    let names: Vec<&str> = parsed
        .events
        .iter()
        .map(|e| e.identity.name.as_str())
        .collect();
    assert_eq!(names, vec!["Second", "First", "Third"]);
}

#[test]
fn test_weights_within_unit_range() {
    let text = "A\t0\t0\t1900\ta\nB\t0\t0\t1950\tb\nC\t0\t0\t2000\tc\nD\t0\t0\t1925\td";
    let parsed = parse_events(text, &strict()).unwrap();
    for event in &parsed.events {
        assert!((0.0..=1.0).contains(&event.weight));
    }
    let weights: Vec<f64> = parsed.events.iter().map(|e| e.weight).collect();
    assert_eq!(weights, vec![0.0, 0.25, 0.5, 1.0]);
}

#[test]
fn test_line_numbers_survive_sorting() {
    let text = "A\t0\t0\t2000\ta\n\nB\t0\t0\t1900\tb";
    let parsed = parse_events(text, &strict()).unwrap();
    assert_eq!(parsed.events[0].line, 3);
    assert_eq!(parsed.events[1].line, 1);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_empty_input_produces_no_events() {
    let parsed = parse_events("", &strict()).unwrap();
    assert!(parsed.events.is_empty());
    assert_eq!(parsed.warnings, vec![Warning::EmptyInput]);
}

#[test]
fn test_blank_lines_are_ignored() {
    let text = "\n   \n\r\nP1\t1.0\t2.0\t1900\tAlice\n\nP2\t3.0\t4.0\t1950\tBob\n";
    let parsed = parse_events(text, &strict()).unwrap();
    assert_eq!(parsed.events.len(), 2);
    assert!(parsed.skipped.is_empty());
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_single_row_has_zero_weight() {
    let parsed = parse_events("P1\t1.0\t2.0\t1900\tAlice", &strict()).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert_eq!(parsed.events[0].weight, 0.0);
    assert_eq!(
        parsed.warnings,
        vec![Warning::DegenerateYearRange { year: 1900 }]
    );
}

#[test]
fn test_delimiter_only_lines_are_malformed() {
    let text = "A\t1\t2\t1900\tx\n\t\t\t\t\n,,,,\n";

    match parse_events(text, &strict()) {
        Err(PipelineError::MalformedRows(rows)) => {
            let lines: Vec<usize> = rows.iter().map(|r| r.line).collect();
            assert_eq!(lines, vec![2, 3]);
            assert!(matches!(rows[0].kind, RowErrorKind::InvalidLongitude(_)));
        }
        other => panic!("expected malformed rows, got {:?}", other),
    }

    let parsed = parse_events(text, &lenient()).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert_eq!(parsed.skipped.len(), 2);
}

#[test]
fn test_degenerate_year_range() {
    let text = "P1\t1.0\t2.0\t1900\tAlice\nP2\t3.0\t4.0\t1900\tBob";
    let parsed = parse_events(text, &strict()).unwrap();

    assert_eq!(parsed.events.len(), 2);
    assert!(parsed.events.iter().all(|e| e.weight == 0.0));
    assert_eq!(
        parsed.warnings,
        vec![Warning::DegenerateYearRange { year: 1900 }]
    );
}

#[test]
fn test_year_weight_function() {
    assert_eq!(year_weight(1900, 1900, 2000), 0.0);
    assert_eq!(year_weight(2000, 1900, 2000), 1.0);
    assert_eq!(year_weight(1950, 1900, 2000), 0.5);
    assert_eq!(year_weight(1900, 1900, 1900), 0.0);
}

// ============================================================================
// Malformed rows
// ============================================================================

#[test]
fn test_too_few_columns_is_rejected() {
    let err = parse_events("P1\t1.0\t2.0\t1900", &strict()).unwrap_err();
    let rows = err.row_errors();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].line, 1);
    assert_eq!(rows[0].kind, RowErrorKind::TooFewColumns { found: 4 });
}

#[test]
fn test_invalid_numbers_are_reported_per_row() {
    let text = "A\tx\t2.0\t1900\tAlice\n\
                B\t1.0\ty\t1900\tBob\n\
                C\t1.0\t2.0\tabc\tCarol\n\
                D\t1.0\t2.0\t1900\tDave";
    let err = parse_events(text, &strict()).unwrap_err();

    assert!(matches!(err, PipelineError::MalformedRows(_)));
    let kinds: Vec<RowErrorKind> = err.row_errors().iter().map(|r| r.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            RowErrorKind::InvalidLongitude("x".to_string()),
            RowErrorKind::InvalidLatitude("y".to_string()),
            RowErrorKind::InvalidYear("abc".to_string()),
        ]
    );
    assert!(err.to_string().contains("3 malformed row(s)"));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_non_finite_coordinates_are_rejected() {
    let err = parse_events("A\tNaN\t2.0\t1900\tAlice", &strict()).unwrap_err();
    assert_eq!(
        err.row_errors()[0].kind,
        RowErrorKind::InvalidLongitude("NaN".to_string())
    );

    let err = parse_events("A\t1.0\tinf\t1900\tAlice", &strict()).unwrap_err();
    assert_eq!(
        err.row_errors()[0].kind,
        RowErrorKind::InvalidLatitude("inf".to_string())
    );
}

#[test]
fn test_out_of_range_coordinates_are_rejected() {
    let err = parse_events("A\t10.0\t95.0\t1900\tAlice", &strict()).unwrap_err();
    assert!(matches!(
        err.row_errors()[0].kind,
        RowErrorKind::CoordinateOutOfRange { .. }
    ));
}

#[test]
fn test_fractional_year_is_invalid() {
    let err = parse_events("A\t1.0\t2.0\t1900.5\tAlice", &strict()).unwrap_err();
    assert_eq!(
        err.row_errors()[0].kind,
        RowErrorKind::InvalidYear("1900.5".to_string())
    );
}

#[test]
fn test_lenient_policy_skips_bad_rows() {
    let text = "A\t1.0\t2.0\t1900\tAlice\n\
                B\t1.0\t2.0\tunknown\tBob\n\
                C\t1.0\t2.0\t2000\tCarol";
    let parsed = parse_events(text, &lenient()).unwrap();

    assert_eq!(parsed.events.len(), 2);
    assert_eq!(parsed.skipped.len(), 1);
    assert_eq!(parsed.skipped[0].line, 2);
    // The year range only covers accepted rows
    assert_eq!(parsed.events[0].weight, 0.0);
    assert_eq!(parsed.events[1].weight, 1.0);
}

#[test]
fn test_lenient_policy_with_only_bad_rows() {
    let parsed = parse_events("A\t1.0\n", &lenient()).unwrap();
    assert!(parsed.events.is_empty());
    assert_eq!(parsed.skipped.len(), 1);
    assert!(!parsed.warnings.contains(&Warning::EmptyInput));
}

// ============================================================================
// Coordinate equality
// ============================================================================

#[test]
fn test_coordinate_equality_is_exact() {
    assert_eq!(Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.0));
    assert_ne!(Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.000001));
}

#[test]
fn test_negative_zero_equals_zero() {
    let mut set = HashSet::new();
    set.insert(Coordinate::new(0.0, 10.0));
    set.insert(Coordinate::new(-0.0, 10.0));
    assert_eq!(set.len(), 1);
    assert_eq!(Coordinate::new(-0.0, 10.0), Coordinate::new(0.0, 10.0));
}

#[test]
fn test_planar_distance() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(3.0, 4.0);
    assert_eq!(a.planar_distance(&b), 5.0);
}
