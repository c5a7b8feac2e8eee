// core/tests/test_estimate.rs
use plotarea_core::{estimate_local_area, AreaMethod, Coordinate};
use plotarea_core::estimate::METERS_PER_DEGREE;

#[test]
fn hundred_meter_square_at_equator_is_about_one_hectare() {
    let d = 100.0 / METERS_PER_DEGREE;
    let track = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, d),
        Coordinate::new(d, d),
        Coordinate::new(d, 0.0),
    ];
    let est = estimate_local_area(&track).expect("estimate");
    assert_eq!(est.method, AreaMethod::Planar);
    assert!((est.area_ha - 1.0).abs() < 0.02, "area_ha={}", est.area_ha);
    assert!((est.area_m2 - 10_000.0).abs() < 200.0);
}

#[test]
fn orientation_does_not_change_the_sign() {
    let d = 0.001;
    let cw = [Coordinate::new(0.0, 0.0), Coordinate::new(d, 0.0), Coordinate::new(d, d), Coordinate::new(0.0, d)];
    let ccw: Vec<_> = cw.iter().rev().copied().collect();
    let a = estimate_local_area(&cw).unwrap().area_ha;
    let b = estimate_local_area(&ccw).unwrap().area_ha;
    assert!(a > 0.0);
    assert!((a - b).abs() < 1e-12);
}

#[test]
fn fewer_than_three_vertices_has_no_estimate() {
    assert!(estimate_local_area(&[]).is_none());
    assert!(estimate_local_area(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001)]).is_none());
}
