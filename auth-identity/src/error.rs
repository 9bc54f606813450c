use std::time::Duration;

use thiserror::Error;

use crate::models::IdentityCategory;

/// Fault raised by an identity store while answering a lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Identity store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Infrastructure and configuration failures of the identity subsystem.
///
/// A rejected login is not an error: it is
/// [`ResolutionResult::InvalidCredential`](crate::ResolutionResult::InvalidCredential).
/// Every variant here means "try again later" or "fix the deployment",
/// never "access denied".
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("{category} lookup unavailable: {source}")]
    LookupUnavailable {
        category: IdentityCategory,
        #[source]
        source: LookupError,
    },

    #[error("Credential resolution timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid identity key: {0}")]
    InvalidIdentityKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IdentityError {
    pub(crate) fn lookup(category: IdentityCategory, source: LookupError) -> Self {
        Self::LookupUnavailable { category, source }
    }

    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LookupUnavailable { .. } | Self::Timeout(_))
    }
}

impl From<config::ConfigError> for IdentityError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
