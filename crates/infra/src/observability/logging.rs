use atelier_domain::{AtelierError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter from `RUST_LOG` if set, otherwise from the configured level.
///
/// # Errors
/// Returns `AtelierError::Config` when the configured directive is invalid.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| AtelierError::Config(format!("Invalid log level '{}': {e}", config.level)))
}

/// Install the global `tracing` subscriber.
///
/// Human-readable output by default, one JSON object per line when
/// `config.json` is set.
///
/// # Errors
/// Returns `AtelierError::Config` for an invalid filter and
/// `AtelierError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = Registry::default().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| AtelierError::Internal(format!("tracing already initialised: {e}")))?;
    tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}
