//! Live prediction loop.
//!
//! Every detected hand is sent for classification as soon as it arrives.
//! Requests are neither throttled nor coalesced, so several can be in flight
//! at once and replies are applied in the order they resolve. A slow reply
//! can therefore overwrite a newer one and the label can briefly regress to
//! an older prediction; the view is best effort.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::actions::action_for;
use crate::dispatch::liveness::{InFlight, LivenessToken};
use crate::events::{EventSink, ViewEvent};
use crate::landmarks::types::HandEvent;
use crate::service::api::GestureApi;

/// Label shown while no prediction is available.
pub const IDLE_LABEL: &str = "Idle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LiveMode {
    Idle,
    Predicting,
}

/// Read-only view of the live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub mode: LiveMode,
    pub prediction: String,
    pub action: Option<String>,
    pub requests_failed: u64,
    pub last_error: Option<String>,
}

struct LiveState {
    mode: LiveMode,
    prediction: String,
    action: Option<String>,
    requests_failed: u64,
    last_error: Option<String>,
    token: LivenessToken,
}

impl LiveState {
    fn idle() -> Self {
        Self {
            mode: LiveMode::Idle,
            prediction: IDLE_LABEL.to_string(),
            action: None,
            requests_failed: 0,
            last_error: None,
            token: LivenessToken::revoked(),
        }
    }
}

/// Dispatches hand events to the classifier while the feed is live.
pub struct LiveController {
    api: Arc<dyn GestureApi>,
    runtime: Handle,
    events: EventSink,
    state: Arc<Mutex<LiveState>>,
    in_flight: InFlight,
}

impl LiveController {
    pub fn new(api: Arc<dyn GestureApi>, runtime: Handle, events: EventSink) -> Self {
        Self {
            api,
            runtime,
            events,
            state: Arc::new(Mutex::new(LiveState::idle())),
            in_flight: InFlight::new(),
        }
    }

    /// Enter `Predicting`. No-op when already live.
    pub fn start(&self) {
        let mut state = self.state.lock();
        if state.mode == LiveMode::Predicting {
            return;
        }
        *state = LiveState::idle();
        state.mode = LiveMode::Predicting;
        state.token = LivenessToken::new();
        info!("live prediction started");
    }

    /// Return to `Idle`. Replies still in flight are discarded on arrival.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.token.revoke();
        if state.mode == LiveMode::Predicting {
            info!("live prediction stopped");
        }
        *state = LiveState::idle();
    }

    /// Handle one bridge event. Only detected hands while live produce a
    /// request.
    pub fn on_hand_event(&self, event: HandEvent) {
        let HandEvent::Detected(landmarks) = event else {
            return;
        };
        let token = {
            let state = self.state.lock();
            if state.mode != LiveMode::Predicting {
                return;
            }
            state.token.clone()
        };

        let guard = self.in_flight.enter();
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        self.runtime.spawn(async move {
            let _guard = guard;
            let result = api.predict(&landmarks).await;

            let mut state = state.lock();
            if !token.is_alive() {
                debug!("discarding prediction for a stopped feed");
                return;
            }
            match result {
                Ok(reply) => {
                    let action = action_for(&reply.prediction).map(str::to_string);
                    state.prediction = reply.prediction.clone();
                    state.action = action.clone();
                    events(ViewEvent::PredictionChanged {
                        prediction: reply.prediction,
                        action,
                    });
                }
                Err(e) => {
                    warn!("prediction request failed: {e}");
                    state.requests_failed += 1;
                    state.last_error = Some(e.user_message().to_string());
                }
            }
        });
    }

    pub fn is_live(&self) -> bool {
        self.state.lock().mode == LiveMode::Predicting
    }

    pub fn prediction(&self) -> String {
        self.state.lock().prediction.clone()
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        let state = self.state.lock();
        LiveSnapshot {
            mode: state.mode,
            prediction: state.prediction.clone(),
            action: state.action.clone(),
            requests_failed: state.requests_failed,
            last_error: state.last_error.clone(),
        }
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }
}
