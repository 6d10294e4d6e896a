use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single captured frame from the camera.
pub struct Frame {
    /// Raw pixel data (RGB).
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture timestamp in microseconds.
    pub timestamp_us: u64,
}

/// Callback invoked on the capture thread once per delivered frame.
pub type FrameCallback = Arc<dyn Fn(&Frame) + Send + Sync>;

/// Callback for reporting a capture failure after the stream started.
/// Argument: error message.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Requested capture format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Time between frames at the configured rate.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}
