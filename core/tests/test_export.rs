// core/tests/test_export.rs
use chrono::{TimeZone, Utc};
use plotarea_core::export::{export_collection, export_file_name};
use plotarea_core::geojson::Geometry;
use plotarea_core::{read_export, write_export, Coordinate};

fn track() -> Vec<Coordinate> {
    vec![
        Coordinate::new(59.91, 10.75),
        Coordinate::new(59.91, 10.7512345678),
        Coordinate::new(59.911, 10.751),
    ]
}

#[test]
fn file_name_uses_iso_date() {
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 23, 59, 0).unwrap();
    assert_eq!(export_file_name(now), "farm-plot-2024-05-17.geojson");
}

#[test]
fn export_has_closed_ring_and_no_area() {
    let now = Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap();
    let fc = export_collection(&track(), now);
    let v = fc.to_value();

    assert_eq!(v["type"], "FeatureCollection");
    let props = &v["features"][0]["properties"];
    assert_eq!(props["point_count"], 3);
    assert_eq!(props["timestamp"], "2024-05-17T08:00:00.000000Z");
    assert!(props.get("area_ha").is_none(), "local export must not carry area_ha");

    let ring = v["features"][0]["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 4);
    assert_eq!(ring[0], ring[3]);
    assert_eq!(ring[1][0].as_f64(), Some(10.751235));
    assert_eq!(ring[1][1].as_f64(), Some(59.91));
}

#[test]
fn write_then_read_back() {
    let dir = std::env::temp_dir().join(format!("plotarea-export-{}", std::process::id()));
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

    let path = write_export(&dir, &track(), now).expect("write export");
    assert!(path.ends_with("farm-plot-2024-06-01.geojson"));

    let fc = read_export(&path).expect("read export");
    assert_eq!(fc.features.len(), 1);
    match &fc.features[0].geometry {
        Geometry::Polygon { coordinates } => assert_eq!(coordinates[0].len(), 4),
        other => panic!("unexpected geometry {}", other.type_name()),
    }

    std::fs::remove_dir_all(&dir).ok();
}
