//! Tracing/logging initialization.
//!
//! JSON lines by default, filtered through `RUST_LOG`. `TAAG_LOG_FORMAT=pretty`
//! switches to human-readable output for local runs.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const FORMAT_ENV: &str = "TAAG_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    #[error("unknown log format {0:?} (expected \"json\" or \"pretty\")")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
        }
    }
}

impl ObservabilityConfig {
    /// Defaults, with the format taken from `TAAG_LOG_FORMAT` when it names a known format.
    pub fn from_env() -> Self {
        let format = std::env::var(FORMAT_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self::default().with_format(format)
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install the global subscriber described by `config`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with(config: &ObservabilityConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match config.format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(
            "xml".parse::<LogFormat>().unwrap_err(),
            ObservabilityError::UnknownFormat("xml".to_string())
        );
    }

    #[test]
    fn defaults_to_json_at_info() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_filter, "info");

        let config = config.with_format(LogFormat::Pretty).with_default_filter("debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.default_filter, "debug");
    }

    #[test]
    fn init_is_idempotent() {
        let config = ObservabilityConfig::default().with_default_filter("warn");
        init_with(&config);
        init_with(&config);
        crate::init();
    }
}
