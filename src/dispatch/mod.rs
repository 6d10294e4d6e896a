// Dispatch domain: turning hand events into predict and sample requests.

pub mod capture;
pub mod live;
pub mod liveness;
