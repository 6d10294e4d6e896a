use std::sync::Arc;

use tracing::{info, warn};

use crate::camera::error::{CameraError, Result};
use crate::camera::lifecycle::CameraLifecycle;
use crate::camera::sink::FrameSink;
use crate::camera::types::ErrorCallback;
use crate::diagnostics::stats::FeedSnapshot;
use crate::events::{EventSink, ViewEvent};
use crate::landmarks::bridge::{HandEventHandler, LandmarkBridge};
use crate::landmarks::detector::{DetectorConfig, DetectorFactory};
use crate::views::ViewContext;

/// Called on the capture thread when the stream dies, before the view is
/// told the camera is offline.
pub type FeedLostHook = Arc<dyn Fn() + Send + Sync>;

/// One camera feed: the device, the on-screen sink, and the detector bridge
/// that turns frames into hand events.
pub struct CameraFeed {
    camera: CameraLifecycle,
    sink: Arc<FrameSink>,
    bridge: Option<Arc<LandmarkBridge>>,
    detectors: DetectorFactory,
    detector_config: DetectorConfig,
    events: EventSink,
}

impl CameraFeed {
    pub fn new(ctx: &ViewContext, detector_config: DetectorConfig) -> Self {
        Self {
            camera: CameraLifecycle::new(Arc::clone(&ctx.backend), ctx.config.capture.clone()),
            sink: Arc::new(FrameSink::new()),
            bridge: None,
            detectors: Arc::clone(&ctx.detectors),
            detector_config,
            events: Arc::clone(&ctx.events),
        }
    }

    /// Start the camera and route every processed frame to `handler`.
    ///
    /// On failure the view is told the camera is offline and nothing is
    /// retried. If the stream dies later, `on_lost` runs first so the caller
    /// can end its session. No-op while already open.
    pub fn open(&mut self, handler: HandEventHandler, on_lost: FeedLostHook) -> Result<()> {
        if self.camera.is_running() {
            return Ok(());
        }
        self.close_bridge();

        let bridge = Arc::new(LandmarkBridge::new(
            (self.detectors)(&self.detector_config),
            handler,
        ));
        let events = Arc::clone(&self.events);
        let on_error: ErrorCallback = Arc::new(move |reason: &str| {
            warn!("camera feed lost: {reason}");
            on_lost();
            let message = CameraError::Stream(reason.to_string()).user_message();
            events(ViewEvent::CameraOffline {
                message: message.to_string(),
            });
        });

        match self
            .camera
            .start(Arc::clone(&self.sink), bridge.frame_callback(), Some(on_error))
        {
            Ok(()) => {
                info!("camera feed open");
                self.bridge = Some(bridge);
                Ok(())
            }
            Err(e) => {
                warn!("camera failed to start: {e}");
                bridge.close();
                (self.events)(ViewEvent::CameraOffline {
                    message: e.user_message().to_string(),
                });
                Err(e)
            }
        }
    }

    /// Stop the camera, release the detector, and blank the sink. Idempotent.
    pub fn close(&mut self) {
        self.camera.stop();
        self.close_bridge();
        self.sink.clear();
    }

    fn close_bridge(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.camera.is_running()
    }

    pub fn sink(&self) -> &Arc<FrameSink> {
        &self.sink
    }

    pub fn stats(&self) -> Option<FeedSnapshot> {
        self.bridge.as_ref().map(|b| b.stats())
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.close();
    }
}
