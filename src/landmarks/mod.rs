// Landmark domain: detector seam and the frame-to-event bridge.

pub mod bridge;
pub mod detector;
pub mod dummy;
pub mod types;
