//! HTTP-tjeneste for `/calculate` og `/verify`.
//!
//! Handlerne er tilstandsløse: hver forespørsel er en ren funksjon av
//! payloaden. Body leses rått slik at alle feil blir `{ "error": "..." }`.

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use serde_path_to_error as spte;

use crate::config::ServerConfig;
use crate::error::PlotError;
use crate::geodesic::calculate_area;
use crate::metrics::{record_request, render};
use crate::types::Coordinate;
use crate::verify::verify_geojson;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub geojson: Value,
}

/// PlotError som HTTP-svar.
#[derive(Debug)]
pub struct ApiError(pub PlotError);

impl From<PlotError> for ApiError {
    fn from(e: PlotError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, PlotError> {
    let mut de = serde_json::Deserializer::from_slice(body);
    spte::deserialize(&mut de).map_err(|e| PlotError::BadRequest(format!("{}: {}", e.path(), e.inner())))
}

fn track_outcome<T>(endpoint: &str, res: &Result<T, PlotError>) {
    match res {
        Ok(_) => record_request(endpoint, "ok"),
        Err(e) => {
            warn!("[{endpoint}] {e}");
            record_request(endpoint, e.kind());
        }
    }
}

/// `POST /calculate` – `{ "coordinates": [[lat, lng], ...] }` -> FeatureCollection.
pub async fn calculate_handler(body: Bytes) -> Result<Json<Value>, ApiError> {
    let res = parse_body::<CalculateRequest>(&body)
        .and_then(|req| calculate_area(&req.coordinates, chrono::Utc::now()));
    track_outcome("calculate", &res);
    Ok(Json(res?.feature_collection.to_value()))
}

/// `POST /verify` – `{ "geojson": {...} }` -> `{ coordinates: [[lat, lng]...], properties }`.
pub async fn verify_handler(body: Bytes) -> Result<Json<Value>, ApiError> {
    let res = parse_body::<VerifyRequest>(&body).and_then(|req| verify_geojson(&req.geojson));
    track_outcome("verify", &res);
    let uploaded = res?;
    Ok(Json(json!({
        "coordinates": uploaded.coordinates,
        "properties": uploaded.properties,
    })))
}

async fn metrics_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], render())
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn add_hsts(mut resp: Response) -> Response {
    resp.headers_mut().insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    resp
}

pub fn router(cfg: &ServerConfig) -> Router {
    let app = Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/verify", post(verify_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler));
    if cfg.production {
        app.layer(middleware::map_response(add_hsts))
    } else {
        app
    }
}

/// Binder og kjører til Ctrl-C.
pub async fn serve(cfg: &ServerConfig) -> Result<(), PlotError> {
    let listener = tokio::net::TcpListener::bind(cfg.bind.as_str()).await?;
    info!("listening on {} (production={})", cfg.bind, cfg.production);
    axum::serve(listener, router(cfg))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}
