//! In-memory `GestureApi` for controller tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use crate::landmarks::types::LandmarkSet;
use crate::service::api::GestureApi;
use crate::service::error::{Result, ServiceError};
use crate::service::types::{DeleteResponse, GestureList, ModelMetrics, Prediction};

fn unreachable_service() -> ServiceError {
    ServiceError::Connection("connection refused".into())
}

/// Scripted replies plus a record of every call.
///
/// Predictions are served from `predictions` in order as `(delay_ms,
/// Some(label) | None for failure)`; once empty every call answers "Fist".
/// `None` in the other reply slots means the service is unreachable.
pub(crate) struct MockApi {
    pub predictions: Mutex<VecDeque<(u64, Option<&'static str>)>>,
    pub predict_calls: Mutex<Vec<LandmarkSet>>,
    pub collect_calls: Mutex<Vec<(LandmarkSet, String)>>,
    pub collect_fails: AtomicBool,
    pub collect_delay_ms: AtomicU64,
    pub gestures: Mutex<Option<GestureList>>,
    pub delete_status: Mutex<Option<DeleteResponse>>,
    pub delete_calls: Mutex<Vec<String>>,
    pub train_status: Mutex<Option<u16>>,
    pub train_delay_ms: AtomicU64,
    pub train_calls: AtomicUsize,
    pub metrics: Mutex<Option<ModelMetrics>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            predictions: Mutex::new(VecDeque::new()),
            predict_calls: Mutex::new(Vec::new()),
            collect_calls: Mutex::new(Vec::new()),
            collect_fails: AtomicBool::new(false),
            collect_delay_ms: AtomicU64::new(0),
            gestures: Mutex::new(None),
            delete_status: Mutex::new(Some(DeleteResponse {
                status: "success".into(),
                message: None,
            })),
            delete_calls: Mutex::new(Vec::new()),
            train_status: Mutex::new(Some(200)),
            train_delay_ms: AtomicU64::new(0),
            train_calls: AtomicUsize::new(0),
            metrics: Mutex::new(None),
        }
    }

    pub fn script_predictions(&self, replies: &[(u64, Option<&'static str>)]) {
        self.predictions.lock().extend(replies.iter().copied());
    }
}

#[async_trait]
impl GestureApi for MockApi {
    async fn predict(&self, landmarks: &LandmarkSet) -> Result<Prediction> {
        self.predict_calls.lock().push(landmarks.clone());
        let (delay, reply) = self
            .predictions
            .lock()
            .pop_front()
            .unwrap_or((0, Some("Fist")));
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        match reply {
            Some(label) => Ok(Prediction {
                prediction: label.to_string(),
                confidence: Some(0.9),
            }),
            None => Err(ServiceError::ServerError {
                status: 500,
                message: "model not loaded".into(),
            }),
        }
    }

    async fn collect_frame(&self, landmarks: &LandmarkSet, label: &str) -> Result<()> {
        self.collect_calls
            .lock()
            .push((landmarks.clone(), label.to_string()));
        let delay = self.collect_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.collect_fails.load(Ordering::SeqCst) {
            return Err(unreachable_service());
        }
        Ok(())
    }

    async fn list_gestures(&self) -> Result<GestureList> {
        self.gestures.lock().clone().ok_or_else(unreachable_service)
    }

    async fn delete_gesture(&self, name: &str) -> Result<DeleteResponse> {
        self.delete_calls.lock().push(name.to_string());
        self.delete_status.lock().clone().ok_or_else(unreachable_service)
    }

    async fn train_now(&self) -> Result<()> {
        self.train_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.train_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let status = *self.train_status.lock();
        match status {
            Some(code) if (200..300).contains(&code) => Ok(()),
            Some(code) => Err(ServiceError::ServerError {
                status: code,
                message: "rejected".into(),
            }),
            None => Err(unreachable_service()),
        }
    }

    async fn metrics(&self) -> Result<ModelMetrics> {
        self.metrics.lock().clone().ok_or_else(unreachable_service)
    }
}
