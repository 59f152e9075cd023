//! Logging setup for hosts running the pan service
//!
//! Installs a global `tracing` subscriber writing to stderr, as text or JSON.
//! `RUST_LOG` takes precedence over the configured level unless disabled.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `info` or `swf_wavelet=debug`
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
    /// Include the event target
    pub with_target: bool,
    /// Let `RUST_LOG` override `level`
    pub use_env: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            with_target: true,
            use_env: true,
        }
    }
}

/// Errors emitted when configuring logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging has already been initialised")]
    AlreadyInitialised,
    #[error("invalid filter directive: {0}")]
    Filter(String),
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG` (when enabled and set) or the configured level
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if config.use_env {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::Filter(e.to_string()))
}

/// Install the global subscriber. Only the first call succeeds.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    INITIALISED
        .set(())
        .map_err(|_| LoggingError::AlreadyInitialised)?;

    let registry = Registry::default().with(filter);
    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(config.with_target),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.with_target),
            )
            .try_init()
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive() {
        let config = LoggingConfig {
            level: "swf=loud".into(),
            use_env: false,
            ..LoggingConfig::default()
        };
        assert!(matches!(
            build_filter(&config),
            Err(LoggingError::Filter(_))
        ));
    }

    #[test]
    fn test_second_init_rejected() {
        let config = LoggingConfig {
            use_env: false,
            ..LoggingConfig::default()
        };
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::AlreadyInitialised)
        ));
    }

    #[test]
    fn test_partial_json() {
        let config: LoggingConfig = serde_json::from_str(r#"{"json":true}"#).unwrap();
        assert!(config.json);
        assert_eq!(config.level, "info");
    }
}
