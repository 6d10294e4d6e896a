use serde::{Deserialize, Serialize};

use crate::landmarks::types::LandmarkSet;

/// Body of `POST /process`.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub landmarks: &'a LandmarkSet,
}

/// Reply from `POST /process`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub prediction: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Body of `POST /gestures/collect_frame`.
#[derive(Debug, Serialize)]
pub struct CollectFrameRequest<'a> {
    pub landmarks: &'a LandmarkSet,
    pub label: &'a str,
}

/// Reply from `GET /gestures/list`.
///
/// `gestures` is absent on a service that has not been set up yet; callers
/// fall back to the pretrained defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GestureList {
    #[serde(default)]
    pub gestures: Option<Vec<String>>,
    #[serde(default)]
    pub custom_gestures: Vec<String>,
}

/// Reply from `DELETE /gestures/delete/{name}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl DeleteResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Reply from `GET /metrics`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub accuracies: Vec<f64>,
    #[serde(default)]
    pub overall_precision: f64,
    #[serde(default)]
    pub total_epochs: u32,
    #[serde(default)]
    pub avg_latency: f64,
}
