use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::filter::{DEFAULT_MAX_ACCURACY_M, DEFAULT_MIN_DISTANCE_M, PositionFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Slår på HSTS-header på alle svar.
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".into(),
            production: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub max_accuracy_m: f64,
    pub min_distance_m: f64,
    /// Hvor lenge en ferdig økt vises før den nullstilles (sek).
    pub finished_reset_secs: i64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_accuracy_m: DEFAULT_MAX_ACCURACY_M,
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            finished_reset_secs: 5,
        }
    }
}

impl RecordingConfig {
    pub fn filter(&self) -> PositionFilter {
        PositionFilter::new(self.max_accuracy_m, self.min_distance_m)
    }

    pub fn finished_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.finished_reset_secs.max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub recording: RecordingConfig,
    pub client: ClientConfig,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            recording: RecordingConfig::default(),
            client: ClientConfig::default(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Miljøvariabler overstyrer fil/default.
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|k| std::env::var(k).ok());
        self
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = get("PLOTAREA_BIND") {
            self.server.bind = bind;
        }
        if let Some(dir) = get("PLOTAREA_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(url) = get("PLOTAREA_SERVER_URL") {
            self.client.base_url = url;
        }
        if get("ENVIRONMENT").as_deref() == Some("production") {
            self.server.production = true;
        }
    }
}

/// Leser konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, Box<dyn Error + Send + Sync>> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let cfg: AppConfig = serde_json::from_str(&contents)?;
        info!("config loaded from {} (bind={})", path.display(), cfg.server.bind);
        Ok(cfg)
    } else {
        warn!("config {} not found, using defaults", path.display());
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_bind_and_production() {
        let mut cfg = AppConfig::default();
        cfg.apply_vars(|k| match k {
            "PLOTAREA_BIND" => Some("127.0.0.1:8080".into()),
            "ENVIRONMENT" => Some("production".into()),
            _ => None,
        });
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        assert!(cfg.server.production);
        assert_eq!(cfg.client.timeout_secs, 10);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"recording": {"min_distance_m": 3.5}}"#).unwrap();
        assert_eq!(cfg.recording.min_distance_m, 3.5);
        assert_eq!(cfg.recording.max_accuracy_m, 20.0);
        assert_eq!(cfg.server.bind, "0.0.0.0:5000");
    }
}
