use std::sync::Arc;

use crate::camera::error::Result;
use crate::camera::sink::FrameSink;
use crate::dispatch::capture::{CaptureController, CaptureError, CaptureSnapshot, RetrainOutcome};
use crate::gesture::GestureName;
use crate::landmarks::bridge::HandEventHandler;
use crate::library::DeleteOutcome;
use crate::views::feed::{CameraFeed, FeedLostHook};
use crate::views::ViewContext;

/// The training page for one gesture label.
pub struct CaptureView {
    feed: CameraFeed,
    controller: Arc<CaptureController>,
}

impl CaptureView {
    pub fn mount(ctx: &ViewContext, label: GestureName) -> Self {
        Self {
            feed: CameraFeed::new(ctx, ctx.config.capture_detector.clone()),
            controller: Arc::new(CaptureController::new(
                Arc::clone(&ctx.api),
                ctx.runtime.clone(),
                Arc::clone(&ctx.events),
                label,
            )),
        }
    }

    /// Start the camera so the hand can be tracked. No-op when already open.
    pub fn open_camera(&mut self) -> Result<()> {
        let controller = Arc::clone(&self.controller);
        let on_hand: HandEventHandler = Arc::new(move |event| controller.on_hand_event(event));
        let controller = Arc::clone(&self.controller);
        let on_lost: FeedLostHook = Arc::new(move || controller.camera_lost());
        self.feed.open(on_hand, on_lost)
    }

    pub fn start_recording(&self) -> std::result::Result<(), CaptureError> {
        self.controller.start_recording()
    }

    pub fn cancel_recording(&self) {
        self.controller.cancel_recording();
    }

    pub async fn request_retrain(&self) -> RetrainOutcome {
        self.controller.request_retrain().await
    }

    pub async fn delete_gesture_data(&self) -> DeleteOutcome {
        self.controller.delete_gesture_data().await
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        self.controller.snapshot()
    }

    pub fn label(&self) -> &GestureName {
        self.controller.label()
    }

    pub fn camera_open(&self) -> bool {
        self.feed.is_open()
    }

    pub fn sink(&self) -> &Arc<FrameSink> {
        self.feed.sink()
    }

    /// Wait for outstanding uploads and requests to finish.
    pub async fn settled(&self) {
        self.controller.in_flight().settled().await;
    }

    /// Leave the page. Dropping the view does the same.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.controller.shutdown();
        self.feed.close();
    }
}

impl Drop for CaptureView {
    fn drop(&mut self) {
        self.teardown();
    }
}
