//! Training sample capture.
//!
//! While recording, every detected hand becomes one labelled sample upload
//! until the recording holds [`SAMPLES_PER_RECORDING`] samples. The counter
//! is bumped and the upload initiated in the same critical section, so
//! concurrent deliveries can never push it past the limit.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::dispatch::liveness::{InFlight, LivenessToken};
use crate::events::{EventSink, ViewEvent};
use crate::gesture::GestureName;
use crate::landmarks::types::{HandEvent, LandmarkSet};
use crate::library::DeleteOutcome;
use crate::service::api::GestureApi;
use crate::service::error::ServiceError;

pub const SAMPLES_PER_RECORDING: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("no hand is in view")]
    NotArmed,
    #[error("a recording is already running")]
    AlreadyRecording,
    #[error("the capture view is closed")]
    NotMounted,
}

impl CaptureError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotArmed => "Show your hand to the camera before recording.",
            Self::AlreadyRecording => "Recording is already in progress.",
            Self::NotMounted => "Open the capture view first.",
        }
    }
}

/// What happened to a retrain trigger. Training itself runs on the service
/// and its completion is never reported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RetrainOutcome {
    Accepted,
    Rejected { status: u16 },
    Unreachable,
    AlreadyPending,
}

impl RetrainOutcome {
    /// Classify the reply to a `train_now` call.
    pub fn from_reply(reply: Result<(), ServiceError>) -> Self {
        match reply {
            Ok(()) => {
                info!("retrain accepted");
                Self::Accepted
            }
            Err(ServiceError::ServerError { status, message }) => {
                warn!(status, "retrain rejected: {message}");
                Self::Rejected { status }
            }
            Err(e) => {
                warn!("retrain request failed: {e}");
                Self::Unreachable
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub label: String,
    pub armed: bool,
    pub recording: bool,
    pub frames_accepted: u32,
    pub uploads_failed: u32,
    pub retrain_pending: bool,
}

struct CaptureState {
    armed: bool,
    recording: bool,
    frames_accepted: u32,
    uploads_failed: u32,
    /// Alive until the view goes away.
    mounted: LivenessToken,
    /// Alive for the current recording only.
    session: LivenessToken,
}

pub struct CaptureController {
    api: Arc<dyn GestureApi>,
    runtime: Handle,
    events: EventSink,
    label: GestureName,
    state: Arc<Mutex<CaptureState>>,
    retrain_pending: Arc<AtomicBool>,
    in_flight: InFlight,
}

/// Clears the pending flag however the trigger ends, including when the
/// caller drops the future.
struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CaptureController {
    pub fn new(
        api: Arc<dyn GestureApi>,
        runtime: Handle,
        events: EventSink,
        label: GestureName,
    ) -> Self {
        Self {
            api,
            runtime,
            events,
            label,
            state: Arc::new(Mutex::new(CaptureState {
                armed: false,
                recording: false,
                frames_accepted: 0,
                uploads_failed: 0,
                mounted: LivenessToken::new(),
                session: LivenessToken::revoked(),
            })),
            retrain_pending: Arc::new(AtomicBool::new(false)),
            in_flight: InFlight::new(),
        }
    }

    pub fn label(&self) -> &GestureName {
        &self.label
    }

    /// Handle one bridge event: track the armed state and, while recording,
    /// turn a detected hand into an upload.
    pub fn on_hand_event(&self, event: HandEvent) {
        let mut state = self.state.lock();
        if !state.mounted.is_alive() {
            return;
        }

        let hand = event.is_hand();
        if state.armed != hand {
            state.armed = hand;
            (self.events)(ViewEvent::ArmedChanged { armed: hand });
        }

        let HandEvent::Detected(landmarks) = event else {
            return;
        };
        if !state.recording {
            return;
        }

        state.frames_accepted += 1;
        let accepted = state.frames_accepted;
        self.spawn_upload(landmarks, state.session.clone());
        (self.events)(ViewEvent::SampleRecorded {
            label: self.label.to_string(),
            frames_accepted: accepted,
        });

        if accepted >= SAMPLES_PER_RECORDING {
            state.recording = false;
            info!(
                label = %self.label,
                uploads_failed = state.uploads_failed,
                "recording complete"
            );
            (self.events)(ViewEvent::RecordingComplete {
                label: self.label.to_string(),
            });
        }
    }

    fn spawn_upload(&self, landmarks: LandmarkSet, session: LivenessToken) {
        let guard = self.in_flight.enter();
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let label = self.label.to_string();
        self.runtime.spawn(async move {
            let _guard = guard;
            if let Err(e) = api.collect_frame(&landmarks, &label).await {
                warn!("sample upload failed: {e}");
                let mut state = state.lock();
                if session.is_alive() {
                    state.uploads_failed += 1;
                } else {
                    debug!("discarding upload failure for a finished session");
                }
            }
        });
    }

    /// Begin a fresh recording of up to [`SAMPLES_PER_RECORDING`] samples.
    pub fn start_recording(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if !state.mounted.is_alive() {
            return Err(CaptureError::NotMounted);
        }
        if state.recording {
            return Err(CaptureError::AlreadyRecording);
        }
        if !state.armed {
            return Err(CaptureError::NotArmed);
        }
        state.session.revoke();
        state.session = LivenessToken::new();
        state.recording = true;
        state.frames_accepted = 0;
        state.uploads_failed = 0;
        info!(label = %self.label, "recording started");
        Ok(())
    }

    /// Abandon the current recording. Uploads already sent are not recalled.
    pub fn cancel_recording(&self) {
        let mut state = self.state.lock();
        state.session.revoke();
        if state.recording {
            info!(label = %self.label, "recording cancelled");
        }
        state.recording = false;
        state.frames_accepted = 0;
        state.uploads_failed = 0;
    }

    /// The camera died: drop the recording and the armed state, since no
    /// more hand events will arrive until it is reopened.
    pub fn camera_lost(&self) {
        let mut state = self.state.lock();
        if !state.mounted.is_alive() {
            return;
        }
        state.session.revoke();
        if state.recording {
            warn!(
                label = %self.label,
                frames_accepted = state.frames_accepted,
                "recording abandoned, camera lost"
            );
        }
        state.recording = false;
        state.frames_accepted = 0;
        state.uploads_failed = 0;
        if state.armed {
            state.armed = false;
            (self.events)(ViewEvent::ArmedChanged { armed: false });
        }
    }

    /// Ask the service to retrain on everything collected so far.
    pub async fn request_retrain(&self) -> RetrainOutcome {
        if self.retrain_pending.swap(true, Ordering::AcqRel) {
            return RetrainOutcome::AlreadyPending;
        }
        let _pending = PendingGuard(Arc::clone(&self.retrain_pending));
        let _guard = self.in_flight.enter();

        RetrainOutcome::from_reply(self.api.train_now().await)
    }

    /// Remove every sample stored for this label. The local counter is reset
    /// whatever the service answers.
    pub async fn delete_gesture_data(&self) -> DeleteOutcome {
        let reply = {
            let _guard = self.in_flight.enter();
            self.api.delete_gesture(self.label.as_str()).await
        };
        let outcome = DeleteOutcome::from_reply(reply);

        let mut state = self.state.lock();
        if state.mounted.is_alive() {
            state.session.revoke();
            state.recording = false;
            state.frames_accepted = 0;
            state.uploads_failed = 0;
        }
        outcome
    }

    /// Tear down for unmount. Outstanding uploads finish but no longer touch
    /// state, and later hand events are ignored.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.mounted.revoke();
        state.session.revoke();
        state.armed = false;
        state.recording = false;
        state.frames_accepted = 0;
        state.uploads_failed = 0;
    }

    pub fn is_recording(&self) -> bool {
        self.state.lock().recording
    }

    pub fn frames_accepted(&self) -> u32 {
        self.state.lock().frames_accepted
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        let state = self.state.lock();
        CaptureSnapshot {
            label: self.label.to_string(),
            armed: state.armed,
            recording: state.recording,
            frames_accepted: state.frames_accepted,
            uploads_failed: state.uploads_failed,
            retrain_pending: self.retrain_pending.load(Ordering::Acquire),
        }
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }
}
