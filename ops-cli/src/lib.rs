//! Operations CLI for ClinicCare credential administration
//!
//! - Hash a password into the digest format the identity stores expect
//! - Dry-run a login against a fixture file of patients, doctors and staff
//!
//! # Example Usage
//!
//! ```bash
//! # Digest for seeding a record
//! clinicare hash-password --password secret
//! clinicare hash-password --encoding base64      # prompts for the password
//!
//! # Resolve a login against fixtures
//! clinicare login --fixtures clinic.json --email pat@x.com
//! clinicare login --fixtures clinic.json --email pat@x.com --password secret --strategy concurrent
//! ```
//!
//! Fixture files look like:
//!
//! ```json
//! {
//!   "patients": [{ "id": 1, "email": "pat@x.com", "password_hash": "2bb8..." }],
//!   "doctors":  [{ "id": 1, "email": "doc@x.com", "password_hash": "...", "is_active": false }],
//!   "staff":    [{ "id": 1, "email": "chief@x.com", "password_hash": "...", "designation": "Admin" }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use auth_identity::{
    CredentialResolver, DigestEncoding, IdentityCategory, IdentityConfig, IdentityRecord,
    InMemoryIdentityLookup, LoginHandler, LoginRequest, LoginResponse, PasswordHasher,
    Sha256PasswordHasher,
};
use serde::Deserialize;

/// One fixture row: an email plus the stored record.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecord {
    pub email: String,
    #[serde(flatten)]
    pub record: IdentityRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub patients: Vec<FixtureRecord>,
    pub doctors: Vec<FixtureRecord>,
    pub staff: Vec<FixtureRecord>,
}

impl Fixtures {
    /// # Errors
    ///
    /// Fails on malformed JSON or an email listed twice within one category.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixtures: Self = serde_json::from_str(json).context("Invalid fixture JSON")?;
        for category in IdentityCategory::PROBE_ORDER {
            let mut seen = HashSet::new();
            for entry in fixtures.records(category) {
                if !seen.insert(entry.email.to_lowercase()) {
                    bail!("Duplicate {} email in fixtures: {}", category, entry.email);
                }
            }
        }
        Ok(fixtures)
    }

    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures from {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn records(&self, category: IdentityCategory) -> &[FixtureRecord] {
        match category {
            IdentityCategory::Patient => &self.patients,
            IdentityCategory::Doctor => &self.doctors,
            IdentityCategory::Staff => &self.staff,
        }
    }

    fn lookup(&self, category: IdentityCategory) -> InMemoryIdentityLookup {
        self.records(category)
            .iter()
            .map(|entry| (entry.email.clone(), entry.record.clone()))
            .collect()
    }

    pub fn into_resolver(self, config: IdentityConfig) -> CredentialResolver {
        CredentialResolver::with_config(
            Arc::new(self.lookup(IdentityCategory::Patient)),
            Arc::new(self.lookup(IdentityCategory::Doctor)),
            Arc::new(self.lookup(IdentityCategory::Staff)),
            config,
        )
    }
}

pub fn hash_password(password: &str, encoding: DigestEncoding) -> String {
    Sha256PasswordHasher::new(encoding).hash(password)
}

/// Resolve one login against `fixtures` and return what the login endpoint would answer.
///
/// # Errors
///
/// Propagates infrastructure failures (timeouts, store errors).
pub async fn run_login(
    fixtures: Fixtures,
    config: IdentityConfig,
    email: &str,
    password: &str,
) -> Result<LoginResponse> {
    let handler = LoginHandler::new(Arc::new(fixtures.into_resolver(config)));
    Ok(handler.login(LoginRequest::new(email, password)).await?)
}
