// Logger configuration
use serde::{Deserialize, Serialize};

use crate::redactor::{PiiRedactor, RedactionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub redaction_enabled: bool,
    /// Fallback filter directive when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggerConfig {
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Build the redactor matching this configuration.
    pub fn redactor(&self) -> PiiRedactor {
        if self.redaction_enabled {
            PiiRedactor::new(RedactionConfig::default())
        } else {
            PiiRedactor::disabled()
        }
    }
}
