use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, writing to stderr so stdout stays free for
/// command output.
///
/// An explicit `level` wins over `RUST_LOG`; with neither, `info` is used.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
