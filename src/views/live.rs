use std::sync::Arc;

use crate::camera::error::Result;
use crate::camera::sink::FrameSink;
use crate::diagnostics::stats::FeedSnapshot;
use crate::dispatch::live::{LiveController, LiveSnapshot};
use crate::landmarks::bridge::HandEventHandler;
use crate::views::feed::{CameraFeed, FeedLostHook};
use crate::views::ViewContext;

/// The live recognition page: a camera feed with the current prediction.
pub struct LiveView {
    feed: CameraFeed,
    controller: Arc<LiveController>,
}

impl LiveView {
    pub fn mount(ctx: &ViewContext) -> Self {
        Self {
            feed: CameraFeed::new(ctx, ctx.config.live_detector.clone()),
            controller: Arc::new(LiveController::new(
                Arc::clone(&ctx.api),
                ctx.runtime.clone(),
                Arc::clone(&ctx.events),
            )),
        }
    }

    /// Switch live recognition on or off. Returns whether it is now on.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.controller.is_live() {
            self.stop();
            return Ok(false);
        }
        self.controller.start();
        let controller = Arc::clone(&self.controller);
        let on_hand: HandEventHandler = Arc::new(move |event| controller.on_hand_event(event));
        let controller = Arc::clone(&self.controller);
        let on_lost: FeedLostHook = Arc::new(move || controller.stop());
        if let Err(e) = self.feed.open(on_hand, on_lost) {
            self.controller.stop();
            return Err(e);
        }
        Ok(true)
    }

    fn stop(&mut self) {
        self.controller.stop();
        self.feed.close();
    }

    pub fn is_live(&self) -> bool {
        self.controller.is_live()
    }

    pub fn prediction(&self) -> String {
        self.controller.prediction()
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        self.controller.snapshot()
    }

    pub fn feed_stats(&self) -> Option<FeedSnapshot> {
        self.feed.stats()
    }

    pub fn sink(&self) -> &Arc<FrameSink> {
        self.feed.sink()
    }

    /// Wait for outstanding predictions to resolve.
    pub async fn settled(&self) {
        self.controller.in_flight().settled().await;
    }

    /// Leave the page. Dropping the view does the same.
    pub fn unmount(mut self) {
        self.stop();
    }
}

impl Drop for LiveView {
    fn drop(&mut self) {
        self.stop();
    }
}
