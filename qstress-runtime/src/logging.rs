use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const DEFAULT_LOG_FILTER: &str = "qstress=info,qstress_runtime=info";

/// Pick the log filter: an explicit directive wins, then `RUST_LOG`, then the default.
pub fn env_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global `tracing` subscriber.
pub fn init_logging(directive: Option<&str>) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(directive))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
