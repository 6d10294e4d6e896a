use async_trait::async_trait;

use crate::landmarks::types::LandmarkSet;
use crate::service::error::Result;
use crate::service::types::{DeleteResponse, GestureList, ModelMetrics, Prediction};

/// The remote classifier and training service.
///
/// Every call is best effort: callers decide how to degrade on error.
#[async_trait]
pub trait GestureApi: Send + Sync {
    /// Classify one hand.
    async fn predict(&self, landmarks: &LandmarkSet) -> Result<Prediction>;

    /// Upload one labelled training sample. The reply body is ignored.
    async fn collect_frame(&self, landmarks: &LandmarkSet, label: &str) -> Result<()>;

    async fn list_gestures(&self) -> Result<GestureList>;

    /// Remove every stored sample for `name`.
    async fn delete_gesture(&self, name: &str) -> Result<DeleteResponse>;

    /// Ask the service to retrain in the background. Success means the
    /// request was accepted, not that training finished.
    async fn train_now(&self) -> Result<()>;

    async fn metrics(&self) -> Result<ModelMetrics>;
}
