use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "meter_api=info";

/// Filter from a `RUST_LOG`-style string; `meter_api=info` when it is absent,
/// blank, or unparseable.
pub fn build_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global fmt subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(rust_log.as_deref()))
        .with_target(false)
        .init();
}
