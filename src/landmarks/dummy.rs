use crate::camera::types::Frame;
use crate::landmarks::detector::{DetectorConfig, DetectorError, HandDetector};
use crate::landmarks::types::{Landmark, LandmarkSet, HAND_LANDMARK_COUNT};

/// Simulated detector for use with the dummy camera.
///
/// Reports an open palm that drifts slowly across the frame. With a
/// non-zero `hidden_frames`, the hand disappears for that many frames after
/// every `visible_frames` frames.
pub struct DummyDetector {
    visible_frames: u64,
    hidden_frames: u64,
    frame_index: u64,
    closed: bool,
}

impl DummyDetector {
    pub fn new(_config: &DetectorConfig) -> Self {
        Self {
            visible_frames: 1,
            hidden_frames: 0,
            frame_index: 0,
            closed: false,
        }
    }

    pub fn with_gaps(mut self, visible_frames: u64, hidden_frames: u64) -> Self {
        self.visible_frames = visible_frames.max(1);
        self.hidden_frames = hidden_frames;
        self
    }

    fn hand_visible(&self) -> bool {
        let period = self.visible_frames + self.hidden_frames;
        self.frame_index % period < self.visible_frames
    }

    fn open_palm(&self) -> Result<LandmarkSet, DetectorError> {
        let drift = (self.frame_index % 100) as f32 / 1000.0;
        let points = (0..HAND_LANDMARK_COUNT)
            .map(|i| {
                // Wrist at index 0, then four joints per finger.
                let finger = i.saturating_sub(1) / 4;
                let joint = i.saturating_sub(1) % 4 + usize::from(i > 0);
                Landmark::new(
                    0.35 + drift + finger as f32 * 0.06,
                    0.8 - joint as f32 * 0.09,
                    Some(-0.02 * joint as f32),
                )
            })
            .collect();
        LandmarkSet::new(points)
    }
}

impl HandDetector for DummyDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, DetectorError> {
        if self.closed {
            return Err(DetectorError::Closed);
        }
        let visible = self.hand_visible();
        let hand = self.open_palm();
        self.frame_index += 1;
        if visible {
            Ok(vec![hand?])
        } else {
            Ok(vec![])
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
