// Camera domain: device access, frame delivery, and the live-feed sink.

pub mod backend;
pub mod dummy;
pub mod error;
pub mod lifecycle;
pub mod sink;
pub mod types;
