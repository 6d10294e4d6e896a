use serde::Serialize;
use std::sync::Arc;

/// Notifications pushed from the controllers to whatever renders the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ViewEvent {
    /// The camera could not be started or stopped delivering frames.
    #[serde(rename_all = "camelCase")]
    CameraOffline { message: String },

    /// The displayed live prediction changed.
    #[serde(rename_all = "camelCase")]
    PredictionChanged {
        prediction: String,
        action: Option<String>,
    },

    /// A hand appeared or disappeared.
    #[serde(rename_all = "camelCase")]
    ArmedChanged { armed: bool },

    /// One more sample was accepted into the current recording.
    #[serde(rename_all = "camelCase")]
    SampleRecorded { label: String, frames_accepted: u32 },

    /// The recording reached its sample limit.
    #[serde(rename_all = "camelCase")]
    RecordingComplete { label: String },
}

/// Callback that receives view events. Called from the capture thread and
/// from network tasks while the emitting controller holds its state lock, so
/// it must be cheap and must not call back into that controller.
pub type EventSink = Arc<dyn Fn(ViewEvent) + Send + Sync>;
