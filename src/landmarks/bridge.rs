use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::camera::types::{Frame, FrameCallback};
use crate::diagnostics::stats::{FeedSnapshot, FeedStats};
use crate::landmarks::detector::HandDetector;
use crate::landmarks::types::HandEvent;

/// Receives one event per processed frame.
pub type HandEventHandler = Arc<dyn Fn(HandEvent) + Send + Sync>;

/// Turns camera frames into hand events.
///
/// Every frame yields either `Detected` with the first hand or `NoHand`.
/// Detector failures drop the frame without raising anything.
pub struct LandmarkBridge {
    detector: Mutex<Option<Box<dyn HandDetector>>>,
    handler: HandEventHandler,
    stats: Mutex<FeedStats>,
}

impl LandmarkBridge {
    pub fn new(detector: Box<dyn HandDetector>, handler: HandEventHandler) -> Self {
        Self {
            detector: Mutex::new(Some(detector)),
            handler,
            stats: Mutex::new(FeedStats::new()),
        }
    }

    /// Run the detector on one frame and forward the result.
    pub fn on_frame(&self, frame: &Frame) {
        let started = Instant::now();
        let result = {
            let mut detector = self.detector.lock();
            match detector.as_mut() {
                Some(d) => d.detect(frame),
                None => return,
            }
        };

        match result {
            Ok(hands) => {
                let event = hands
                    .into_iter()
                    .next()
                    .map_or(HandEvent::NoHand, HandEvent::Detected);
                self.stats
                    .lock()
                    .record_frame(event.is_hand(), started.elapsed().as_micros() as u64);
                (self.handler)(event);
            }
            Err(e) => {
                debug!("frame skipped: {e}");
                self.stats.lock().record_drop();
            }
        }
    }

    /// Adapter for `CameraLifecycle::start`.
    pub fn frame_callback(self: &Arc<Self>) -> FrameCallback {
        let bridge = Arc::clone(self);
        Arc::new(move |frame: &Frame| bridge.on_frame(frame))
    }

    /// Release the detector. Frames arriving afterwards are ignored.
    pub fn close(&self) {
        if let Some(mut detector) = self.detector.lock().take() {
            detector.close();
        }
    }

    pub fn stats(&self) -> FeedSnapshot {
        self.stats.lock().snapshot()
    }
}
