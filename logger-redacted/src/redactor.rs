use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"\b(?:\+1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b").unwrap();
    static ref CREDENTIAL_REGEX: Regex = Regex::new(r"(?i)\b(password|passwd|pwd|secret)(\s*[:=]\s*)\S+").unwrap();
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_credentials: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_credentials: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Everything off; text passes through untouched.
    pub fn none() -> Self {
        Self {
            redact_emails: false,
            redact_phones: false,
            redact_credentials: false,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }

    pub fn with_custom_pattern(mut self, pattern: Regex, replacement: impl Into<String>) -> Self {
        self.custom_patterns.push((pattern, replacement.into()));
        self
    }
}

/// PII redactor for log messages and structured log fields
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn disabled() -> Self {
        Self::new(RedactionConfig::none())
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Credentials first so an email-shaped password is never half-masked.
        if self.config.redact_credentials {
            result = CREDENTIAL_REGEX
                .replace_all(&result, "${1}${2}[REDACTED]")
                .to_string();
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    /// Redact a value known to be a single email address, e.g. a login field.
    pub fn redact_email(&self, email: &str) -> String {
        if !self.config.redact_emails {
            return email.to_string();
        }
        self.mask_email(email)
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| self.mask_email(&caps[0]))
            .to_string()
    }

    fn mask_email(&self, email: &str) -> String {
        if self.config.hash_for_correlation {
            return format!("EMAIL[{}]", self.hash_value(&email.to_lowercase()));
        }
        match email.split_once('@') {
            Some((local, domain)) => {
                let first = |s: &str| s.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}***", first(local), first(domain))
            }
            None => "***@***".to_string(),
        }
    }

    fn redact_phones(&self, text: &str) -> String {
        PHONE_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("PHONE[{}]", self.hash_value(&caps[0]))
                } else {
                    "(***) ***-****".to_string()
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(&result[..8]) // Use first 8 bytes for shorter hash
    }
}
