// Service domain: the recognition service's HTTP surface.

pub mod api;
pub mod client;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;
