// core/tests/test_geodesic.rs
use chrono::{TimeZone, Utc};
use plotarea_core::geojson::Geometry;
use plotarea_core::{calculate_area, AreaMethod, Coordinate, PlotError};

fn coords(pairs: &[[f64; 2]]) -> Vec<Coordinate> {
    pairs.iter().map(|p| Coordinate::from(*p)).collect()
}

fn ring_of(calc: &plotarea_core::CalculatedArea) -> Vec<Vec<f64>> {
    match &calc.feature_collection.features[0].geometry {
        Geometry::Polygon { coordinates } => coordinates[0].clone(),
        other => panic!("expected Polygon, got {}", other.type_name()),
    }
}

#[test]
fn equator_square_matches_reference_area() {
    let track = coords(&[[0.0, 0.0], [0.0, 0.001], [0.001, 0.001], [0.001, 0.0]]);
    let calc = calculate_area(&track, Utc::now()).expect("valid square");

    assert_eq!(calc.area.method, AreaMethod::Geodesic);
    // WGS84: 111.32 m x 110.57 m ≈ 1.2309 ha
    assert!((calc.area.area_ha - 1.2309).abs() < 0.0005, "area_ha={}", calc.area.area_ha);
    assert!((calc.area.area_m2 / 10_000.0 - calc.area.area_ha).abs() < 1e-3);
    assert_eq!(calc.point_count, 4);
}

#[test]
fn walking_direction_does_not_change_area() {
    let ccw = coords(&[[0.0, 0.0], [0.0, 0.001], [0.001, 0.001], [0.001, 0.0]]);
    let cw = coords(&[[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.001]]);

    let a = calculate_area(&ccw, Utc::now()).unwrap();
    let b = calculate_area(&cw, Utc::now()).unwrap();

    assert!(b.area.area_m2 < 20_000.0, "clockwise area_m2={}", b.area.area_m2);
    assert!((a.area.area_ha - b.area.area_ha).abs() < 1e-4);
    assert!((b.area.area_ha - 1.2309).abs() < 0.0005, "area_ha={}", b.area.area_ha);
}

#[test]
fn clockwise_ring_away_from_equator() {
    // Oslo, med og mot klokka
    let cw = coords(&[[59.91, 10.75], [59.912, 10.75], [59.912, 10.752], [59.91, 10.752]]);
    let ccw = coords(&[[59.91, 10.75], [59.91, 10.752], [59.912, 10.752], [59.912, 10.75]]);
    let a = calculate_area(&cw, Utc::now()).unwrap();
    let b = calculate_area(&ccw, Utc::now()).unwrap();

    // 222.8 m x 111.9 m
    assert!((a.area.area_m2 - 24_933.65).abs() < 5.0, "area_m2={}", a.area.area_m2);
    assert!((a.area.area_m2 - b.area.area_m2).abs() < 0.05);
}

#[test]
fn ring_is_closed_in_lng_lat_order() {
    let track = coords(&[[59.91, 10.75], [59.91, 10.752], [59.912, 10.752], [59.912, 10.75]]);
    let calc = calculate_area(&track, Utc::now()).unwrap();
    let ring = ring_of(&calc);

    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());
    assert_eq!(ring[0], vec![10.75, 59.91]);
}

#[test]
fn already_closed_input_is_not_closed_twice() {
    let track = coords(&[[0.0, 0.0], [0.0, 0.001], [0.001, 0.001], [0.0, 0.0]]);
    let calc = calculate_area(&track, Utc::now()).unwrap();
    assert_eq!(ring_of(&calc).len(), 4);
}

#[test]
fn coordinates_are_rounded_to_six_decimals() {
    let track = coords(&[[0.0000001, 0.0], [0.0, 0.0010004], [0.0010006, 0.001], [0.001, 0.0]]);
    let calc = calculate_area(&track, Utc::now()).unwrap();
    let ring = ring_of(&calc);
    assert_eq!(ring[0], vec![0.0, 0.0]);
    assert_eq!(ring[1], vec![0.001, 0.0]);
    assert_eq!(ring[2], vec![0.001, 0.001001]);
}

#[test]
fn properties_carry_area_timestamp_and_count() {
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap();
    let track = coords(&[[0.0, 0.0], [0.0, 0.001], [0.001, 0.001], [0.001, 0.0]]);
    let calc = calculate_area(&track, now).unwrap();
    let props = &calc.feature_collection.features[0].properties;

    assert_eq!(props["timestamp"], "2024-05-17T12:30:00.000000Z");
    assert_eq!(props["point_count"], 4);
    assert_eq!(props["area_ha"].as_f64(), Some(calc.area.area_ha));
    assert_eq!(props["area_m2"].as_f64(), Some(calc.area.area_m2));
}

#[test]
fn two_points_are_insufficient() {
    let track = coords(&[[0.0, 0.0], [0.0, 0.001]]);
    match calculate_area(&track, Utc::now()) {
        Err(PlotError::InsufficientPoints { got }) => assert_eq!(got, 2),
        other => panic!("expected InsufficientPoints, got {other:?}"),
    }
}

#[test]
fn figure_eight_is_degenerate() {
    let track = coords(&[[0.0, 0.0], [0.001, 0.001], [0.0, 0.001], [0.001, 0.0]]);
    assert!(matches!(
        calculate_area(&track, Utc::now()),
        Err(PlotError::DegeneratePolygon(_))
    ));
}

#[test]
fn collinear_points_are_degenerate() {
    let track = coords(&[[0.0, 0.0], [0.0, 0.001], [0.0, 0.002]]);
    assert!(matches!(
        calculate_area(&track, Utc::now()),
        Err(PlotError::DegeneratePolygon(_))
    ));
}

#[test]
fn points_collapsing_after_rounding_are_degenerate() {
    let track = coords(&[[0.0, 0.0], [0.0000001, 0.0], [0.0, 0.0000002]]);
    assert!(matches!(
        calculate_area(&track, Utc::now()),
        Err(PlotError::DegeneratePolygon(_))
    ));
}
