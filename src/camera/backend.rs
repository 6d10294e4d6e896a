use crate::camera::error::Result;
use crate::camera::types::{CaptureConfig, Frame};

/// Platform-agnostic camera backend.
///
/// Opening a source is the only point where device access can be refused;
/// a backend reports that as `CameraError::Unavailable` or
/// `CameraError::PermissionDenied`.
pub trait CameraBackend: Send + Sync {
    /// Acquire the camera and return an exclusive frame source.
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn FrameSource>>;
}

/// An open camera stream.
///
/// `next_frame` blocks until a frame is available, paced by the device.
/// `Ok(None)` means the stream ended normally.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the device. Called exactly once by the lifecycle manager.
    fn close(&mut self);
}

/// Backend used when no camera integration is available on this platform.
pub struct NullBackend;

impl CameraBackend for NullBackend {
    fn open(&self, _config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
        Err(crate::camera::error::CameraError::Unavailable(
            "no camera backend on this platform".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::error::CameraError;

    /// Source that yields a fixed number of frames, then ends.
    struct CountingSource {
        remaining: usize,
    }

    impl FrameSource for CountingSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            Ok(Some(Frame {
                data: vec![0; 12],
                width: 2,
                height: 2,
                timestamp_us: 0,
            }))
        }

        fn close(&mut self) {}
    }

    struct MockBackend;

    impl CameraBackend for MockBackend {
        fn open(&self, _config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
            Ok(Box::new(CountingSource { remaining: 2 }))
        }
    }

    #[test]
    fn mock_backend_yields_frames_then_ends() {
        let mut source = MockBackend.open(&CaptureConfig::default()).unwrap();
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        source.close();
    }

    #[test]
    fn null_backend_reports_unavailable() {
        let result = NullBackend.open(&CaptureConfig::default());
        assert!(matches!(result, Err(CameraError::Unavailable(_))));
    }

    #[test]
    fn trait_object_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn CameraBackend>>();
    }
}
