//! Camera lifecycle: acquire a frame source, run the frame-trigger thread,
//! release the device on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, error, info};

use crate::camera::backend::{CameraBackend, FrameSource};
use crate::camera::error::{CameraError, Result};
use crate::camera::sink::FrameSink;
use crate::camera::types::{CaptureConfig, ErrorCallback, FrameCallback};

/// Closes the wrapped source when dropped, whichever way the capture
/// thread exits (or if it never starts).
struct SourceGuard(Box<dyn FrameSource>);

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Owns one camera device and its frame-trigger loop.
pub struct CameraLifecycle {
    backend: Arc<dyn CameraBackend>,
    config: CaptureConfig,
    /// Fresh flag per run so a thread from an earlier run can never be
    /// revived by a later `start()`.
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CameraLifecycle {
    pub fn new(backend: Arc<dyn CameraBackend>, config: CaptureConfig) -> Self {
        Self {
            backend,
            config,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Acquire the camera and start delivering frames.
    ///
    /// Each frame is presented to `sink`, then passed to `on_frame` on the
    /// capture thread. If the stream fails after starting, the device is
    /// released and `on_error` is called with the reason. Calling `start`
    /// while already running is a no-op.
    pub fn start(
        &mut self,
        sink: Arc<FrameSink>,
        on_frame: FrameCallback,
        on_error: Option<ErrorCallback>,
    ) -> Result<()> {
        if self.is_running() {
            debug!("camera already running, ignoring start");
            return Ok(());
        }
        // Reap a thread that ended on its own (stream end or failure).
        self.join_thread();

        let source = SourceGuard(self.backend.open(&self.config)?);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        let thread = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || {
                info!("capture thread starting");
                run_frame_loop(source, &sink, &on_frame, on_error.as_ref(), &running_clone);
                running_clone.store(false, Ordering::Relaxed);
                info!("capture thread exiting");
            })
            .map_err(|e| CameraError::Spawn(e.to_string()))?;

        self.running = running;
        self.thread = Some(thread);
        Ok(())
    }

    /// Halt frame delivery and release the camera. Idempotent.
    pub fn stop(&mut self) {
        if self.running.swap(false, Ordering::Relaxed) {
            info!("stopping camera");
        }
        self.join_thread();
    }

    /// Whether frames are currently being delivered.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn join_thread(&mut self) {
        if let Some(handle) = self.thread.take() {
            // A frame callback that tears the view down runs on this very
            // thread; it exits on its own once `running` is cleared.
            if handle.thread().id() == std::thread::current().id() {
                return;
            }
            let _ = handle.join();
        }
    }
}

impl Drop for CameraLifecycle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_frame_loop(
    mut source: SourceGuard,
    sink: &FrameSink,
    on_frame: &FrameCallback,
    on_error: Option<&ErrorCallback>,
    running: &AtomicBool,
) {
    while running.load(Ordering::Relaxed) {
        match source.0.next_frame() {
            Ok(Some(frame)) => {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                let frame = sink.present(frame);
                on_frame(&frame);
            }
            Ok(None) => {
                info!("camera stream ended");
                break;
            }
            Err(e) => {
                error!("camera stream failed: {e}");
                // Cleared before reporting so observers can restart at once.
                running.store(false, Ordering::Relaxed);
                if let Some(cb) = on_error {
                    cb(&e.to_string());
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::types::Frame;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct DeviceCounts {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    /// Backend whose sources yield `frames` frames (forever if `None`),
    /// then optionally fail.
    struct MockBackend {
        counts: Arc<DeviceCounts>,
        frames: Option<usize>,
        fail_after: bool,
        refuse: bool,
    }

    impl MockBackend {
        fn endless(counts: &Arc<DeviceCounts>) -> Self {
            Self {
                counts: Arc::clone(counts),
                frames: None,
                fail_after: false,
                refuse: false,
            }
        }
    }

    struct MockSource {
        counts: Arc<DeviceCounts>,
        remaining: Option<usize>,
        fail_after: bool,
    }

    impl FrameSource for MockSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            std::thread::sleep(Duration::from_millis(2));
            match self.remaining.as_mut() {
                Some(0) if self.fail_after => {
                    return Err(CameraError::Stream("device unplugged".into()))
                }
                Some(0) => return Ok(None),
                Some(n) => *n -= 1,
                None => {}
            }
            Ok(Some(Frame {
                data: vec![1; 3],
                width: 1,
                height: 1,
                timestamp_us: 0,
            }))
        }

        fn close(&mut self) {
            self.counts.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CameraBackend for MockBackend {
        fn open(&self, _config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
            if self.refuse {
                return Err(CameraError::PermissionDenied("user dismissed prompt".into()));
            }
            self.counts.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockSource {
                counts: Arc::clone(&self.counts),
                remaining: self.frames,
                fail_after: self.fail_after,
            }))
        }
    }

    fn counting_callback() -> (FrameCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let cb: FrameCallback = Arc::new(move |_frame| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (cb, count)
    }

    fn wait_until(cond: impl Fn() -> bool) {
        for _ in 0..500 {
            if cond() {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("condition not reached in time");
    }

    #[test]
    fn start_delivers_frames_to_sink_and_callback() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend::endless(&counts)),
            CaptureConfig::default(),
        );
        let sink = Arc::new(FrameSink::new());
        let (cb, count) = counting_callback();

        camera.start(Arc::clone(&sink), cb, None).unwrap();
        assert!(camera.is_running());
        wait_until(|| count.load(Ordering::SeqCst) >= 3);
        assert!(sink.latest().is_some());

        camera.stop();
        assert!(!camera.is_running());
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend::endless(&counts)),
            CaptureConfig::default(),
        );
        camera.stop();
        let (cb, _) = counting_callback();
        camera
            .start(Arc::new(FrameSink::new()), cb, None)
            .unwrap();
        camera.stop();
        camera.stop();
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_frames_delivered_after_stop() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend::endless(&counts)),
            CaptureConfig::default(),
        );
        let (cb, count) = counting_callback();
        camera.start(Arc::new(FrameSink::new()), cb, None).unwrap();
        wait_until(|| count.load(Ordering::SeqCst) >= 1);
        camera.stop();
        let after_stop = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn refused_device_reports_error_and_stays_stopped() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend {
                refuse: true,
                ..MockBackend::endless(&counts)
            }),
            CaptureConfig::default(),
        );
        let (cb, _) = counting_callback();
        let result = camera.start(Arc::new(FrameSink::new()), cb, None);
        assert!(matches!(result, Err(CameraError::PermissionDenied(_))));
        assert!(!camera.is_running());
        assert_eq!(counts.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stream_failure_releases_device_and_reports() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend {
                frames: Some(2),
                fail_after: true,
                ..MockBackend::endless(&counts)
            }),
            CaptureConfig::default(),
        );
        let reported = Arc::new(parking_lot::Mutex::new(None::<String>));
        let reported_clone = Arc::clone(&reported);
        let on_error: ErrorCallback = Arc::new(move |msg| {
            *reported_clone.lock() = Some(msg.to_string());
        });
        let (cb, count) = counting_callback();

        camera
            .start(Arc::new(FrameSink::new()), cb, Some(on_error))
            .unwrap();
        wait_until(|| counts.closed.load(Ordering::SeqCst) == 1 && !camera.is_running());

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(reported.lock().as_deref().unwrap().contains("device unplugged"));
    }

    #[test]
    fn restart_after_stream_end_opens_a_new_source() {
        let counts = Arc::new(DeviceCounts::default());
        let mut camera = CameraLifecycle::new(
            Arc::new(MockBackend {
                frames: Some(1),
                ..MockBackend::endless(&counts)
            }),
            CaptureConfig::default(),
        );
        let (cb, _) = counting_callback();
        camera
            .start(Arc::new(FrameSink::new()), Arc::clone(&cb), None)
            .unwrap();
        wait_until(|| !camera.is_running());

        camera.start(Arc::new(FrameSink::new()), cb, None).unwrap();
        camera.stop();
        assert_eq!(counts.opened.load(Ordering::SeqCst), 2);
        assert_eq!(counts.closed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn drop_releases_camera() {
        let counts = Arc::new(DeviceCounts::default());
        {
            let mut camera = CameraLifecycle::new(
                Arc::new(MockBackend::endless(&counts)),
                CaptureConfig::default(),
            );
            let (cb, _) = counting_callback();
            camera.start(Arc::new(FrameSink::new()), cb, None).unwrap();
        }
        assert_eq!(counts.closed.load(Ordering::SeqCst), 1);
    }
}
