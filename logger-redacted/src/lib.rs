//! Tracing setup with automatic PII and credential redaction
//!
//! Login flows handle email addresses and passwords; neither may reach log
//! output verbatim. This crate provides:
//!
//! - [`init_tracing`]: one-call `tracing-subscriber` setup (env filter,
//!   human-readable or JSON output)
//! - [`PiiRedactor`]: scrubs emails, phone numbers and `password=...` style
//!   assignments from free text, and masks single email fields
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig};
//!
//! let config = LoggerConfig::default().with_log_level("debug");
//! init_tracing(&config).expect("tracing already initialised");
//!
//! let redactor = config.redactor();
//! tracing::info!(email = %redactor.redact_email("pat@clinic.org"), "login attempt");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `config.log_level` when set. Calling this twice
/// returns [`LoggerError::SubscriberInit`] instead of panicking.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()
    };

    result.map_err(|e| LoggerError::SubscriberInit(e.to_string()))
}
