// Diagnostics: per-feed detection statistics.

pub mod stats;
