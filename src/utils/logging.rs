//! Logging setup for hosts embedding the chart library

use tracing_subscriber::EnvFilter;

/// Default filter when neither an explicit level nor `RUST_LOG` is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install a global fmt subscriber
///
/// `level` takes precedence over `RUST_LOG`; an unparseable filter falls
/// back to `DEFAULT_LOG_LEVEL`.
///
/// # Returns
/// `true` if this call installed the subscriber, `false` if one was
/// already set
pub fn init_logging(level: Option<&str>) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .try_init()
        .is_ok()
}

fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
