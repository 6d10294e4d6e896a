// Views: camera, detector, and controller wired together per page.

pub mod capture;
pub mod feed;
pub mod live;

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::camera::backend::CameraBackend;
use crate::config::ConsoleConfig;
use crate::events::EventSink;
use crate::landmarks::detector::DetectorFactory;
use crate::service::api::GestureApi;

/// Everything a view needs to mount.
#[derive(Clone)]
pub struct ViewContext {
    pub backend: Arc<dyn CameraBackend>,
    pub detectors: DetectorFactory,
    pub api: Arc<dyn GestureApi>,
    pub runtime: Handle,
    pub events: EventSink,
    pub config: ConsoleConfig,
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::runtime::Handle;

    use super::ViewContext;
    use crate::camera::backend::{CameraBackend, FrameSource};
    use crate::camera::error::{CameraError, Result};
    use crate::camera::types::{CaptureConfig, Frame};
    use crate::config::ConsoleConfig;
    use crate::events::{EventSink, ViewEvent};
    use crate::landmarks::detector::{DetectorConfig, DetectorFactory, HandDetector};
    use crate::landmarks::dummy::DummyDetector;
    use crate::service::api::GestureApi;
    use crate::service::mock::MockApi;

    /// Fast camera that counts how often it was opened and closed.
    #[derive(Default)]
    pub struct CountingBackend {
        pub opened: Arc<AtomicUsize>,
        pub closed: Arc<AtomicUsize>,
        /// The first source fails after this many frames; later ones run on.
        fail_first_after: Option<usize>,
    }

    impl CountingBackend {
        pub fn failing_after(frames: usize) -> Self {
            Self {
                fail_first_after: Some(frames),
                ..Self::default()
            }
        }
    }

    struct CountingSource {
        closed: Arc<AtomicUsize>,
        remaining: Option<usize>,
    }

    impl FrameSource for CountingSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            std::thread::sleep(Duration::from_millis(2));
            match self.remaining.as_mut() {
                Some(0) => return Err(CameraError::Stream("device unplugged".into())),
                Some(n) => *n -= 1,
                None => {}
            }
            Ok(Some(Frame {
                data: vec![0; 12],
                width: 2,
                height: 2,
                timestamp_us: 0,
            }))
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CameraBackend for CountingBackend {
        fn open(&self, _config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
            let first = self.opened.fetch_add(1, Ordering::SeqCst) == 0;
            Ok(Box::new(CountingSource {
                closed: Arc::clone(&self.closed),
                remaining: self.fail_first_after.filter(|_| first),
            }))
        }
    }

    pub fn context(
        backend: Arc<dyn CameraBackend>,
        api: &Arc<MockApi>,
    ) -> (ViewContext, Arc<Mutex<Vec<ViewEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let sink: EventSink = Arc::new(move |event| events_clone.lock().push(event));
        let detectors: DetectorFactory = Arc::new(|config: &DetectorConfig| {
            Box::new(DummyDetector::new(config)) as Box<dyn HandDetector>
        });
        let api: Arc<dyn GestureApi> = api.clone();
        let ctx = ViewContext {
            backend,
            detectors,
            api,
            runtime: Handle::current(),
            events: sink,
            config: ConsoleConfig::default(),
        };
        (ctx, events)
    }

    pub fn went_offline(events: &Mutex<Vec<ViewEvent>>) -> bool {
        events
            .lock()
            .iter()
            .any(|e| matches!(e, ViewEvent::CameraOffline { .. }))
    }

    /// Poll until `cond` holds, failing after two seconds.
    pub async fn eventually(cond: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not met in time");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
