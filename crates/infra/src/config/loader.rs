//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variable is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ATELIER_API_BASE_URL`: Session/artwork service base URL (required)
//! - `ATELIER_API_TOKEN`: Static bearer token
//! - `ATELIER_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ATELIER_TICK_INTERVAL_MS`: Local tick period in milliseconds
//! - `ATELIER_LOG_LEVEL`: `tracing` filter directive
//! - `ATELIER_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./atelier.json` or `./atelier.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names one and two directories up
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use atelier_domain::{AtelierError, Config, LoggingConfig, Result, ServiceConfig, TimerConfig};

const CONFIG_FILE_NAMES: [&str; 4] = ["atelier.json", "atelier.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the base URL is
/// not set or a value is invalid, falls back to a config file.
///
/// # Errors
/// Returns `AtelierError::Config` if neither source yields a configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `ATELIER_API_BASE_URL` is required; everything else falls back to
/// the defaults in [`Config`].
///
/// # Errors
/// Returns `AtelierError::Config` if the base URL is missing or a numeric
/// variable cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("ATELIER_API_BASE_URL")?;
    let api_token = std::env::var("ATELIER_API_TOKEN").ok().filter(|t| !t.is_empty());
    let timeout_secs = env_parse::<u64>("ATELIER_API_TIMEOUT_SECS")?;

    let timer = match env_parse::<u64>("ATELIER_TICK_INTERVAL_MS")? {
        Some(tick_interval_ms) => TimerConfig { tick_interval_ms },
        None => TimerConfig::default(),
    };

    let defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: std::env::var("ATELIER_LOG_LEVEL").unwrap_or(defaults.level),
        json: env_bool("ATELIER_LOG_JSON", defaults.json),
    };

    let config = Config {
        service: ServiceConfig { base_url, api_token, timeout_secs },
        timer,
        logging,
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AtelierError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AtelierError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AtelierError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AtelierError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content, choosing the format by the
/// file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AtelierError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AtelierError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AtelierError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: &Config) -> Result<()> {
    url::Url::parse(&config.service.base_url).map_err(|e| {
        AtelierError::Config(format!("Invalid service base URL {}: {e}", config.service.base_url))
    })?;
    if config.timer.tick_interval_ms == 0 {
        return Err(AtelierError::Config("Tick interval must be greater than zero".into()));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its two parents, and the same
/// three levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AtelierError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable; set but unparsable is an error.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AtelierError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
