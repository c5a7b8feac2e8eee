use serde::Serialize;
use serde_json::{Map, Value};
use serde_path_to_error as spte;

use crate::error::PlotError;
use crate::geojson::{Feature, GeoJson, Geometry, Position};
use crate::types::Coordinate;

/// Validert og normalisert opplastet polygon, klar for visning.
///
/// `coordinates` er i `[lat, lng]`-rekkefølge og uten den dupliserte
/// lukkenoden. Uavhengig av opptakssesjonen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedPolygon {
    pub coordinates: Vec<Coordinate>,
    pub properties: Map<String, Value>,
}

impl UploadedPolygon {
    /// Tidligere beregnet areal, hvis filen hadde det.
    pub fn area_ha(&self) -> Option<f64> {
        self.properties.get("area_ha").and_then(Value::as_f64)
    }
}

/// Verifiserer et vilkårlig JSON-dokument som påstår å være GeoJSON.
pub fn verify_geojson(doc: &Value) -> Result<UploadedPolygon, PlotError> {
    let parsed: GeoJson = spte::deserialize(doc)
        .map_err(|e| PlotError::InvalidGeometry(format!("geojson parse at {}: {}", e.path(), e.inner())))?;
    verify_parsed(&parsed)
}

pub fn verify_parsed(doc: &GeoJson) -> Result<UploadedPolygon, PlotError> {
    let feature: &Feature = match doc {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .first()
            .ok_or_else(|| PlotError::InvalidGeometry("No features found in GeoJSON".into()))?,
        GeoJson::Feature(f) => f,
    };

    let rings = match &feature.geometry {
        Geometry::Polygon { coordinates } => coordinates,
        other => {
            return Err(PlotError::InvalidGeometry(format!(
                "Only Polygon geometry supported (got {})",
                other.type_name()
            )))
        }
    };

    let outer = rings
        .first()
        .ok_or_else(|| PlotError::InvalidGeometry("Polygon has no rings".into()))?;
    let mut coordinates = outer
        .iter()
        .enumerate()
        .map(|(i, p)| position_to_coordinate(i, p))
        .collect::<Result<Vec<_>, _>>()?;

    if coordinates.len() > 1 && coordinates.first() == coordinates.last() {
        coordinates.pop();
    }
    // telles etter at lukkenoden er fjernet
    if coordinates.len() < 3 {
        return Err(PlotError::InvalidGeometry(format!(
            "Invalid polygon coordinates ({} positions)",
            outer.len()
        )));
    }

    Ok(UploadedPolygon {
        coordinates,
        properties: feature.properties.clone(),
    })
}

fn position_to_coordinate(index: usize, p: &Position) -> Result<Coordinate, PlotError> {
    // [lng, lat, (alt)] -> (lat, lng); høyde ignoreres
    let (lng, lat) = match p.as_slice() {
        [lng, lat, ..] => (*lng, *lat),
        _ => {
            return Err(PlotError::InvalidGeometry(format!(
                "position {index} needs [lng, lat]"
            )))
        }
    };
    let c = Coordinate::new(lat, lng);
    if !c.is_valid() {
        return Err(PlotError::InvalidGeometry(format!(
            "position {index} out of range: [{lng}, {lat}]"
        )));
    }
    Ok(c)
}
