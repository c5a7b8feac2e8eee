//! Opptak av teigomkrets fra GPS og arealberegning.
//!
//! Rå målinger -> `PositionFilter` -> `RecordingSession` (noder + planært estimat)
//! -> ved avslutning lokal eksport og autoritativt geodesisk areal.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod estimate;
pub mod export;
pub mod filter;
pub mod geodesic;
pub mod geojson;
pub mod metrics;
pub mod server;
pub mod session;
pub mod source;
pub mod types;
pub mod verify;

pub use client::{AreaService, HttpAreaClient, LocalAreaService};
pub use config::{load_config, AppConfig, ClientConfig, RecordingConfig, ServerConfig};
pub use controller::{AreaOutcome, FinishReport, PlotController};
pub use error::PlotError;
pub use estimate::estimate_local_area;
pub use export::{read_export, write_export};
pub use filter::{haversine_m, FilterDecision, PositionFilter};
pub use geodesic::{calculate_area, CalculatedArea};
pub use session::{FixOutcome, RecordingSession, SessionState};
pub use source::{PositionEvent, PositionSource, ReplaySource};
pub use types::{AreaMethod, AreaResult, Coordinate, RawFix, RoundTo};
pub use verify::{verify_geojson, UploadedPolygon};
