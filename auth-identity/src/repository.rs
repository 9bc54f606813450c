use crate::{error::LookupError, models::IdentityRecord};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Read-only email lookup against one identity store (patients, doctors or staff).
///
/// Implementations must be idempotent and side-effect free. `Ok(None)` means
/// no record; `Err` means the store could not answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, LookupError>;
}

/// In-memory identity store for testing, fixtures and development.
///
/// Emails match case-insensitively.
#[derive(Clone, Default)]
pub struct InMemoryIdentityLookup {
    records: Arc<DashMap<String, IdentityRecord>>,
}

impl InMemoryIdentityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(email: &str) -> String {
        email.to_lowercase()
    }

    /// Insert or replace the record registered under `email`.
    pub fn insert(&self, email: &str, record: IdentityRecord) -> Option<IdentityRecord> {
        self.records.insert(Self::key(email), record)
    }

    pub fn remove(&self, email: &str) -> Option<IdentityRecord> {
        self.records.remove(&Self::key(email)).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(String, IdentityRecord)> for InMemoryIdentityLookup {
    fn from_iter<I: IntoIterator<Item = (String, IdentityRecord)>>(iter: I) -> Self {
        let lookup = Self::new();
        for (email, record) in iter {
            lookup.insert(&email, record);
        }
        lookup
    }
}

#[async_trait]
impl IdentityLookup for InMemoryIdentityLookup {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, LookupError> {
        Ok(self.records.get(&Self::key(email)).map(|entry| entry.value().clone()))
    }
}
