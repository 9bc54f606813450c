use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{error::IdentityError, hasher::DigestEncoding};

/// Environment prefix, e.g. `AUTH_IDENTITY__PROBE_STRATEGY=concurrent`.
pub const ENV_PREFIX: &str = "AUTH_IDENTITY";

/// How the three identity stores are queried for one login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// One store at a time, stopping at the first verified match.
    #[default]
    Sequential,
    /// All stores at once; results reconciled in probe order.
    Concurrent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub probe_strategy: ProbeStrategy,
    /// Deadline for a whole resolution; `None` waits indefinitely.
    pub resolve_timeout_ms: Option<u64>,
    pub digest_encoding: DigestEncoding,
    pub redact_emails_in_logs: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            probe_strategy: ProbeStrategy::Sequential,
            resolve_timeout_ms: None,
            digest_encoding: DigestEncoding::Hex,
            redact_emails_in_logs: true,
        }
    }
}

impl IdentityConfig {
    /// Load from `AUTH_IDENTITY__*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] on unparsable or invalid values.
    pub fn from_env() -> Result<Self, IdentityError> {
        Self::load(None)
    }

    /// Load from an optional file (any format the `config` crate detects by
    /// extension), then environment variables, over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when the file is unreadable or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, IdentityError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`IdentityError::Configuration`] when the timeout is zero.
    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.resolve_timeout_ms == Some(0) {
            return Err(IdentityError::Configuration(
                "resolve_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_probe_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.probe_strategy = strategy;
        self
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_digest_encoding(mut self, encoding: DigestEncoding) -> Self {
        self.digest_encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = IdentityConfig::default();
        assert_eq!(config.probe_strategy, ProbeStrategy::Sequential);
        assert_eq!(config.resolve_timeout(), None);
        assert_eq!(config.digest_encoding, DigestEncoding::Hex);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = IdentityConfig {
            resolve_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(IdentityError::Configuration(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("auth-identity-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"probe_strategy": "concurrent", "resolve_timeout_ms": 250, "digest_encoding": "base64"}}"#
        )
        .unwrap();

        let config = IdentityConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.probe_strategy, ProbeStrategy::Concurrent);
        assert_eq!(config.resolve_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.digest_encoding, DigestEncoding::Base64);
        assert!(config.redact_emails_in_logs);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let path = std::env::temp_dir().join(format!("auth-identity-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"resolve_timeout_ms": 0}"#).unwrap();
        let result = IdentityConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(IdentityError::Configuration(_))));
    }
}
