use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::types::Frame;
use crate::landmarks::types::LandmarkSet;

/// Per-frame detector failures. Never fatal; the bridge drops the frame.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector is closed")]
    Closed,

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("malformed landmarks: {0}")]
    Malformed(String),
}

/// Rejected detector settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },
}

/// Model size tier. `Lite` is cheaper on CPU, `Full` is more accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelComplexity {
    Lite,
    Full,
}

/// Detector settings. Only single-hand tracking is supported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DetectorConfig {
    pub model_complexity: ModelComplexity,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl DetectorConfig {
    /// Settings for the live prediction feed.
    pub fn live() -> Self {
        Self {
            model_complexity: ModelComplexity::Full,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }

    /// Settings for sample capture; lighter model, stricter thresholds.
    pub fn capture() -> Self {
        Self {
            model_complexity: ModelComplexity::Lite,
            min_detection_confidence: 0.6,
            min_tracking_confidence: 0.6,
        }
    }

    pub const fn max_num_hands(&self) -> usize {
        1
    }

    /// Check both thresholds lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), DetectorConfigError> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DetectorConfigError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::live()
    }
}

/// External hand-landmark detector.
///
/// Returns every hand found in the frame, best first. The bridge keeps only
/// the first.
pub trait HandDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, DetectorError>;

    /// Release model resources. Further `detect` calls may fail with
    /// `DetectorError::Closed`.
    fn close(&mut self) {}
}

/// Builds a detector for a given configuration; views create one per
/// camera session.
pub type DetectorFactory =
    std::sync::Arc<dyn Fn(&DetectorConfig) -> Box<dyn HandDetector> + Send + Sync>;
