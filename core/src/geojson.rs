//! Eksplisitt GeoJSON-skjema for det systemet leser og skriver.
//!
//! Kun `FeatureCollection` og `Feature` aksepteres på toppnivå, og kun `Polygon`
//! behandles som geometri. Andre geometrityper parses til egne varianter slik at
//! avvisningen kan navngi typen.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Posisjon slik den står i filen: `[lng, lat]` eller `[lng, lat, alt]`.
pub type Position = Vec<f64>;

/// Toppnivå ved innlesing. Skrives aldri direkte; `FeatureCollection`/`Feature`
/// bærer selv `"type"` når de serialiseres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    FeatureCollection(FeatureCollection),
    Feature(Feature),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

// "properties": null er lov i GeoJSON
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    Point {
        #[serde(default)]
        coordinates: Value,
    },
    MultiPoint {
        #[serde(default)]
        coordinates: Value,
    },
    LineString {
        #[serde(default)]
        coordinates: Value,
    },
    MultiLineString {
        #[serde(default)]
        coordinates: Value,
    },
    MultiPolygon {
        #[serde(default)]
        coordinates: Value,
    },
    GeometryCollection {
        #[serde(default)]
        geometries: Value,
    },
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon { .. } => "Polygon",
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Polygon med én ytre ring.
    pub fn polygon(ring: Vec<Position>) -> Self {
        Geometry::Polygon { coordinates: vec![ring] }
    }
}

impl FeatureCollection {
    pub fn single(feature: Feature) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features: vec![feature],
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: FeatureType::Feature,
            geometry,
            properties,
        }
    }
}
