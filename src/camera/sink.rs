use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::camera::types::Frame;

/// Rendering target for the live feed.
///
/// Holds only the most recent frame; a renderer polls `latest()` at its own
/// pace and uses `sequence()` to skip frames it has already drawn.
pub struct FrameSink {
    latest: Mutex<Option<Arc<Frame>>>,
    sequence: AtomicU64,
}

impl FrameSink {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    /// Replace the displayed frame and return it as a shared pointer.
    pub fn present(&self, frame: Frame) -> Arc<Frame> {
        let frame = Arc::new(frame);
        *self.latest.lock() = Some(Arc::clone(&frame));
        self.sequence.fetch_add(1, Ordering::Relaxed);
        frame
    }

    /// Number of frames presented since creation or the last `clear()`.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    pub fn latest(&self) -> Option<Arc<Frame>> {
        self.latest.lock().clone()
    }

    /// Blank the target, e.g. when the camera is released.
    pub fn clear(&self) {
        *self.latest.lock() = None;
        self.sequence.store(0, Ordering::Relaxed);
    }
}

impl Default for FrameSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(value: u8, timestamp: u64) -> Frame {
        Frame {
            data: vec![value; 12],
            width: 2,
            height: 2,
            timestamp_us: timestamp,
        }
    }

    #[test]
    fn empty_sink_has_no_frame() {
        let sink = FrameSink::new();
        assert!(sink.latest().is_none());
        assert_eq!(sink.sequence(), 0);
    }

    #[test]
    fn present_replaces_latest() {
        let sink = FrameSink::new();
        sink.present(make_frame(1, 100));
        sink.present(make_frame(2, 200));

        let latest = sink.latest().unwrap();
        assert_eq!(latest.data[0], 2);
        assert_eq!(latest.timestamp_us, 200);
        assert_eq!(sink.sequence(), 2);
    }

    #[test]
    fn latest_shares_allocation() {
        let sink = FrameSink::new();
        let presented = sink.present(make_frame(42, 1));
        let a = sink.latest().unwrap();
        assert!(Arc::ptr_eq(&a, &presented));
    }

    #[test]
    fn clear_blanks_the_target() {
        let sink = FrameSink::new();
        sink.present(make_frame(1, 1));
        sink.clear();
        assert!(sink.latest().is_none());
        assert_eq!(sink.sequence(), 0);
    }

    #[test]
    fn sink_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameSink>();
    }
}
