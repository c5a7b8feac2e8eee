use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use ureq::Agent;

use crate::error::PlotError;
use crate::geodesic::{calculate_area, CalculatedArea};
use crate::geojson::{FeatureCollection, GeoJson};
use crate::types::{AreaMethod, AreaResult, Coordinate, M2_PER_HECTARE};

/// Kilde for autoritativt areal (prod: HttpAreaClient, test/offline: LocalAreaService).
pub trait AreaService {
    fn calculate(&self, ring: &[Coordinate]) -> Result<CalculatedArea, PlotError>;
}

/// Kjører den geodesiske beregningen i prosess.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAreaService;

impl AreaService for LocalAreaService {
    fn calculate(&self, ring: &[Coordinate]) -> Result<CalculatedArea, PlotError> {
        calculate_area(ring, chrono::Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `POST /calculate` mot tjenesten – enkel blocking-versjon (ureq).
pub struct HttpAreaClient {
    agent: Agent,
    base_url: String,
}

impl HttpAreaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &crate::config::ClientConfig) -> Self {
        Self::new(cfg.base_url.clone(), Duration::from_secs(cfg.timeout_secs))
    }
}

impl AreaService for HttpAreaClient {
    fn calculate(&self, ring: &[Coordinate]) -> Result<CalculatedArea, PlotError> {
        let url = format!("{}/calculate", self.base_url);
        let resp = match self.agent.post(&url).send_json(json!({ "coordinates": ring })) {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) if (400..500).contains(&status) => {
                let message = resp
                    .into_json::<ErrorBody>()
                    .map(|b| b.error)
                    .unwrap_or_else(|_| format!("HTTP {status}"));
                warn!("[calculate] rejected ({status}): {message}");
                return Err(PlotError::ServiceRejected { status, message });
            }
            Err(ureq::Error::Status(status, _)) => {
                return Err(PlotError::NetworkFailure(format!("HTTP {status} from {url}")));
            }
            Err(e) => return Err(PlotError::NetworkFailure(e.to_string())),
        };

        let doc: GeoJson = resp
            .into_json()
            .map_err(|e| PlotError::NetworkFailure(format!("unreadable response: {e}")))?;
        let fc = match doc {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(f) => FeatureCollection::single(f),
        };
        let area = area_from_collection(&fc)
            .ok_or_else(|| PlotError::NetworkFailure("response without area_ha/area_m2".into()))?;
        let point_count = fc
            .features
            .first()
            .and_then(|f| f.properties.get("point_count"))
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(ring.len());

        info!("[calculate] {} -> {:.4} ha", url, area.area_ha);
        Ok(CalculatedArea {
            area,
            point_count,
            feature_collection: fc,
        })
    }
}

fn area_from_collection(fc: &FeatureCollection) -> Option<AreaResult> {
    let props = &fc.features.first()?.properties;
    let area_ha = props.get("area_ha")?.as_f64()?;
    let area_m2 = props
        .get("area_m2")
        .and_then(|v| v.as_f64())
        .unwrap_or(area_ha * M2_PER_HECTARE);
    Some(AreaResult {
        area_m2,
        area_ha,
        method: AreaMethod::Geodesic,
    })
}
