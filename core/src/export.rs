use chrono::{DateTime, Utc};
use log::info;
use serde_json::{json, Map, Value};
use serde_path_to_error as spte;
use std::path::{Path, PathBuf};

use crate::error::PlotError;
use crate::geodesic::iso_timestamp;
use crate::geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use crate::types::{closed_ring, Coordinate};

/// `farm-plot-<YYYY-MM-DD>.geojson`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("farm-plot-{}.geojson", now.format("%Y-%m-%d"))
}

/// Lokal eksport: lukket ring i `[lng, lat]` med `timestamp` og `point_count`.
/// Bevisst uten `area_ha`; det autoritative arealet kommer bare fra tjenesten.
pub fn export_collection(track: &[Coordinate], now: DateTime<Utc>) -> FeatureCollection {
    let ring = closed_ring(track);
    let mut properties = Map::new();
    properties.insert("timestamp".into(), Value::String(iso_timestamp(now)));
    properties.insert("point_count".into(), json!(track.len()));

    FeatureCollection::single(Feature::new(
        Geometry::polygon(ring.iter().map(|c| c.to_lng_lat().to_vec()).collect()),
        properties,
    ))
}

/// Skriver eksporten til `dir` (pretty-print) og returnerer stien.
/// Eksport samme dag overskriver forrige fil.
pub fn write_export(dir: impl AsRef<Path>, track: &[Coordinate], now: DateTime<Utc>) -> Result<PathBuf, PlotError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now));

    let doc = export_collection(track, now).to_value();
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| PlotError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    std::fs::write(&path, json)?;
    info!("export lagret til {} ({} punkter)", path.display(), track.len());
    Ok(path)
}

/// Leser en tidligere eksport tilbake.
pub fn read_export(path: impl AsRef<Path>) -> Result<FeatureCollection, PlotError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    let doc: GeoJson = spte::deserialize(&mut de)
        .map_err(|e| PlotError::InvalidGeometry(format!("export parse at {}: {}", e.path(), e.inner())))?;
    match doc {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(f) => Ok(FeatureCollection::single(f)),
    }
}
