use serde::{Deserialize, Serialize};

use crate::landmarks::detector::DetectorError;

/// Keypoints per detected hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One hand keypoint in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: Option<f32>) -> Self {
        Self { x, y, z }
    }
}

/// The keypoints of one detected hand in one frame.
///
/// Serializes as a bare JSON array of `{x, y, z}` objects, the shape the
/// classifier service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Result<Self, DetectorError> {
        if points.len() != HAND_LANDMARK_COUNT {
            return Err(DetectorError::Malformed(format!(
                "expected {HAND_LANDMARK_COUNT} landmarks, got {}",
                points.len()
            )));
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Landmark] {
        &self.0
    }

    /// The wrist keypoint.
    pub fn wrist(&self) -> Landmark {
        self.0[0]
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = DetectorError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.0
    }
}

/// What the landmark bridge reports for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HandEvent {
    Detected(LandmarkSet),
    NoHand,
}

impl HandEvent {
    pub fn is_hand(&self) -> bool {
        matches!(self, Self::Detected(_))
    }
}

#[cfg(test)]
pub(crate) fn sample_hand(offset: f32) -> LandmarkSet {
    let points = (0..HAND_LANDMARK_COUNT)
        .map(|i| Landmark::new(0.5 + offset, i as f32 / 40.0, Some(-0.01 * i as f32)))
        .collect();
    LandmarkSet::new(points).expect("sample hand has 21 points")
}
