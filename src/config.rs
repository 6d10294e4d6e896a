use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::camera::types::CaptureConfig;
use crate::landmarks::detector::{DetectorConfig, DetectorConfigError};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
    #[error("{role}: {source}")]
    Detector {
        role: &'static str,
        source: DetectorConfigError,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Console settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub service_url: String,
    pub request_timeout_ms: u64,
    pub capture: CaptureConfig,
    pub live_detector: DetectorConfig,
    pub capture_detector: DetectorConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_ms: 5_000,
            capture: CaptureConfig::default(),
            live_detector: DetectorConfig::live(),
            capture_detector: DetectorConfig::capture(),
        }
    }
}

impl ConsoleConfig {
    /// Load from a JSON file, returning defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "service_url must be an http(s) URL, got {:?}",
                self.service_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be positive".into(),
            ));
        }
        if self.capture.width == 0 || self.capture.height == 0 || self.capture.fps == 0 {
            return Err(ConfigError::Invalid(
                "capture width, height and fps must be positive".into(),
            ));
        }
        for (role, detector) in [
            ("live_detector", &self.live_detector),
            ("capture_detector", &self.capture_detector),
        ] {
            detector
                .validate()
                .map_err(|source| ConfigError::Detector { role, source })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
