// core/tests/test_server.rs
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use plotarea_core::server::{calculate_handler, verify_handler, ApiError};
use serde_json::json;

fn body(v: serde_json::Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&v).unwrap())
}

fn status_of(err: ApiError) -> StatusCode {
    err.into_response().status()
}

#[tokio::test]
async fn calculate_returns_feature_collection() {
    let req = json!({ "coordinates": [[0.0, 0.0], [0.0, 0.001], [0.001, 0.001], [0.001, 0.0]] });
    let out = calculate_handler(body(req)).await.expect("200").0;

    assert_eq!(out["type"], "FeatureCollection");
    let f = &out["features"][0];
    assert_eq!(f["type"], "Feature");
    assert_eq!(f["geometry"]["type"], "Polygon");
    assert_eq!(f["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
    let area_ha = f["properties"]["area_ha"].as_f64().unwrap();
    assert!((area_ha - 1.2309).abs() < 0.0005, "area_ha={area_ha}");
    assert_eq!(f["properties"]["point_count"], 4);
    assert!(f["properties"]["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn calculate_rejects_bad_input_with_400() {
    let cases = [
        json!({ "coordinates": [[0.0, 0.0], [0.0, 0.001]] }),
        json!({}),
        json!({ "coordinates": [[0.0, 0.0], [0.001, 0.001], [0.0, 0.001], [0.001, 0.0]] }),
        json!({ "coordinates": "nope" }),
    ];
    for req in cases {
        let err = calculate_handler(body(req.clone())).await.expect_err("should fail");
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST, "{req}");
    }
}

#[tokio::test]
async fn error_body_is_json_with_message() {
    let err = calculate_handler(Bytes::from_static(b"not json")).await.expect_err("bad json");
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), 1 << 16).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(v["error"].as_str().is_some());
}

#[tokio::test]
async fn verify_returns_lat_lng_and_properties() {
    let req = json!({
        "geojson": {
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[10.0, 59.0], [10.001, 59.0], [10.001, 59.001], [10.0, 59.001], [10.0, 59.0]]]
                },
                "properties": { "area_ha": 0.6226 }
            }]
        }
    });
    let out = verify_handler(body(req)).await.expect("200").0;
    let coords = out["coordinates"].as_array().unwrap();
    assert_eq!(coords.len(), 4);
    assert_eq!(coords[0], json!([59.0, 10.0]));
    assert_eq!(out["properties"]["area_ha"], 0.6226);
}

#[tokio::test]
async fn verify_rejects_point_geometry() {
    let req = json!({ "geojson": { "type": "Feature", "geometry": { "type": "Point", "coordinates": [10.0, 59.0] } } });
    let err = verify_handler(body(req)).await.expect_err("point is not a polygon");
    assert!(matches!(err.0, plotarea_core::PlotError::InvalidGeometry(_)));
    assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
}
