use std::time::Instant;

use crate::camera::backend::{CameraBackend, FrameSource};
use crate::camera::error::Result;
use crate::camera::types::{CaptureConfig, Frame};

/// A fake camera backend for running without real hardware.
///
/// Produces a moving grey ramp at the configured frame rate. Pair it with
/// `landmarks::dummy::DummyDetector` to get a hand in every frame.
///
/// Enable via `DUMMY_CAMERA=1` environment variable.
pub struct DummyBackend;

impl DummyBackend {
    pub fn new() -> Self {
        Self
    }

    /// Whether the dummy camera is enabled via environment variable.
    pub fn is_enabled() -> bool {
        std::env::var("DUMMY_CAMERA").is_ok_and(|v| v == "1" || v == "true")
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for DummyBackend {
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(DummySource {
            config: config.clone(),
            started: Instant::now(),
            frame_index: 0,
        }))
    }
}

struct DummySource {
    config: CaptureConfig,
    started: Instant,
    frame_index: u64,
}

impl FrameSource for DummySource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        std::thread::sleep(self.config.frame_interval());
        self.frame_index += 1;
        let width = self.config.width;
        let height = self.config.height;
        let shift = (self.frame_index % 256) as u8;
        let data = (0..width * height)
            .flat_map(|i| {
                let v = ((i % width.max(1)) as u8).wrapping_add(shift);
                [v, v, v]
            })
            .collect();
        Ok(Some(Frame {
            data,
            width,
            height,
            timestamp_us: self.started.elapsed().as_micros() as u64,
        }))
    }

    fn close(&mut self) {
        tracing::debug!("dummy camera closed after {} frames", self.frame_index);
    }
}
