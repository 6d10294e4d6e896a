use serde::Serialize;
use std::time::Instant;

/// Per-feed counters: frames delivered by the camera, frames where a hand was
/// found, and frames the detector failed on.
pub struct FeedStats {
    frame_count: u64,
    hand_count: u64,
    drop_count: u64,
    start_time: Instant,
    last_detect_us: u64,
}

/// Snapshot of feed stats for display or logging.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub fps: f64,
    pub frame_count: u64,
    pub hand_count: u64,
    pub drop_count: u64,
    pub drop_rate: f64,
    pub detect_ms: f64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            hand_count: 0,
            drop_count: 0,
            start_time: Instant::now(),
            last_detect_us: 0,
        }
    }

    /// Record a frame the detector processed, and how long detection took.
    pub fn record_frame(&mut self, hand_found: bool, detect_us: u64) {
        self.frame_count += 1;
        if hand_found {
            self.hand_count += 1;
        }
        self.last_detect_us = detect_us;
    }

    /// Record a frame the detector failed on.
    pub fn record_drop(&mut self) {
        self.drop_count += 1;
    }

    pub fn fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0.0;
        }
        (self.frame_count + self.drop_count) as f64 / elapsed
    }

    /// Drop rate as a percentage (0.0 - 100.0).
    pub fn drop_rate(&self) -> f64 {
        let total = self.frame_count + self.drop_count;
        if total == 0 {
            return 0.0;
        }
        (self.drop_count as f64 / total as f64) * 100.0
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            fps: self.fps(),
            frame_count: self.frame_count,
            hand_count: self.hand_count,
            drop_count: self.drop_count,
            drop_rate: self.drop_rate(),
            detect_ms: self.last_detect_us as f64 / 1000.0,
        }
    }
}

impl Default for FeedStats {
    fn default() -> Self {
        Self::new()
    }
}
