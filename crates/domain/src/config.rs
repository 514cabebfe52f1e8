//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TICK_INTERVAL_MS;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session/artwork service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL shared by the session and artwork endpoints.
    pub base_url: String,
    /// Static bearer token attached to every request, if any.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Per-request timeout. `None` waits for the service indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000/api".to_string(), api_token: None, timeout_secs: None }
    }
}

/// Local timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_interval_ms: DEFAULT_TICK_INTERVAL_MS }
    }
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `atelier_core=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_other_than_service_are_optional() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "service": { "base_url": "https://atelier.test/api" }
        }))
        .unwrap();

        assert_eq!(config.service.base_url, "https://atelier.test/api");
        assert_eq!(config.service.timeout_secs, None);
        assert_eq!(config.timer.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn api_token_is_never_serialized() {
        let mut config = Config::default();
        config.service.api_token = Some("secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
