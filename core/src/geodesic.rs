use chrono::{DateTime, SecondsFormat, Utc};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, GeodesicArea, Line, LineString, Polygon};
use log::info;
use serde_json::{json, Map, Value};

use crate::error::PlotError;
use crate::geojson::{Feature, FeatureCollection, Geometry};
use crate::types::{closed_ring, AreaMethod, AreaResult, Coordinate, RoundTo, M2_PER_HECTARE};

/// Under dette (grader²) regnes ringen som arealløs.
const MIN_PLANAR_AREA_DEG2: f64 = 1e-14;

/// Resultat fra den autoritative beregningen.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedArea {
    pub area: AreaResult,
    pub point_count: usize,
    /// Lukket, rundet ring i `[lng, lat]`-rekkefølge med properties.
    pub feature_collection: FeatureCollection,
}

/// Autoritativt ellipsoidisk areal (WGS84) for en ring.
///
/// 1. lukker ringen, 2. runder til 6 desimaler, 3. validerer enkel polygon med
/// areal > 0, 4. geodesisk areal. Ren funksjon av input (+ tidsstempel).
pub fn calculate_area(coords: &[Coordinate], now: DateTime<Utc>) -> Result<CalculatedArea, PlotError> {
    if coords.len() < 3 {
        return Err(PlotError::InsufficientPoints { got: coords.len() });
    }
    if let Some(bad) = coords.iter().find(|c| !c.is_valid()) {
        return Err(PlotError::DegeneratePolygon(format!(
            "coordinate out of range: [{}, {}]",
            bad.lat(),
            bad.lng()
        )));
    }

    let rounded: Vec<Coordinate> = coords.iter().map(Coordinate::rounded).collect();
    let ring = closed_ring(&rounded);
    validate_simple_ring(&ring)?;

    let polygon = Polygon::new(
        LineString::from(ring.iter().map(|c| (c.lng(), c.lat())).collect::<Vec<_>>()),
        vec![],
    );
    if polygon.unsigned_area() < MIN_PLANAR_AREA_DEG2 {
        return Err(PlotError::DegeneratePolygon("polygon has zero area".into()));
    }
    // fortegnet følger omløpsretningen; begge retninger gir samme teig
    let area_m2_raw = polygon.geodesic_area_signed().abs();
    if !area_m2_raw.is_finite() || area_m2_raw <= 0.0 {
        return Err(PlotError::DegeneratePolygon("polygon has zero area".into()));
    }

    let area_m2 = area_m2_raw.round_to(2);
    let area_ha = (area_m2_raw / M2_PER_HECTARE).round_to(4);
    info!(
        "geodesic area: {:.2} m² ({:.4} ha) from {} points",
        area_m2,
        area_ha,
        coords.len()
    );

    let mut properties = Map::new();
    properties.insert("area_ha".into(), json!(area_ha));
    properties.insert("area_m2".into(), json!(area_m2));
    properties.insert("timestamp".into(), Value::String(iso_timestamp(now)));
    properties.insert("point_count".into(), json!(coords.len()));

    let feature = Feature::new(
        Geometry::polygon(ring.iter().map(|c| c.to_lng_lat().to_vec()).collect()),
        properties,
    );

    Ok(CalculatedArea {
        area: AreaResult {
            area_m2,
            area_ha,
            method: AreaMethod::Geodesic,
        },
        point_count: coords.len(),
        feature_collection: FeatureCollection::single(feature),
    })
}

/// UTC, RFC 3339 med `Z`-suffiks.
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Avviser selvkryssende/berørende ringer og ringer med < 3 distinkte noder.
/// Forventer en lukket ring.
pub fn validate_simple_ring(ring: &[Coordinate]) -> Result<(), PlotError> {
    // Påfølgende duplikater (typisk etter avrunding) ignoreres
    let mut vertices: Vec<Coordinate> = Vec::with_capacity(ring.len());
    for c in ring {
        if vertices.last() != Some(c) {
            vertices.push(*c);
        }
    }
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    let m = vertices.len();
    if m < 3 {
        return Err(PlotError::DegeneratePolygon(format!(
            "ring has {m} distinct vertices, need at least 3"
        )));
    }

    let segment = |i: usize| {
        let a = vertices[i];
        let b = vertices[(i + 1) % m];
        Line::new((a.lng(), a.lat()), (b.lng(), b.lat()))
    };

    for i in 0..m {
        for j in (i + 1)..m {
            let adjacent = j == i + 1 || (i == 0 && j == m - 1);
            match line_intersection(segment(i), segment(j)) {
                None => {}
                // Naboer deler bare endepunktet sitt
                Some(LineIntersection::SinglePoint { is_proper: false, .. }) if adjacent => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    return Err(PlotError::DegeneratePolygon(format!(
                        "self-intersection at [{:.6}, {:.6}]",
                        intersection.y, intersection.x
                    )));
                }
                Some(LineIntersection::Collinear { .. }) => {
                    return Err(PlotError::DegeneratePolygon(format!(
                        "overlapping edges {i} and {j}"
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    #[test]
    fn collinear_vertex_on_straight_edge_is_allowed() {
        let ring = [c(0.0, 0.0), c(0.0, 0.0005), c(0.0, 0.001), c(0.001, 0.001), c(0.001, 0.0), c(0.0, 0.0)];
        assert!(validate_simple_ring(&ring).is_ok());
    }

    #[test]
    fn spike_back_along_edge_is_rejected() {
        let ring = [c(0.0, 0.0), c(0.0, 0.002), c(0.0, 0.001), c(0.001, 0.001), c(0.0, 0.0)];
        assert!(matches!(validate_simple_ring(&ring), Err(PlotError::DegeneratePolygon(_))));
    }

    #[test]
    fn duplicates_collapse_before_counting() {
        let ring = [c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.001), c(0.0, 0.0)];
        assert!(matches!(validate_simple_ring(&ring), Err(PlotError::DegeneratePolygon(_))));
    }
}
