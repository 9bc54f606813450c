//! PostgreSQL-backed identity lookups
//!
//! One [`PostgresIdentityLookup`] per identity table. Each table needs the
//! columns `id BIGINT`, `email TEXT`, `password_hash TEXT` and
//! `is_active BOOLEAN`; staff tables additionally carry `designation TEXT`.

use crate::{error::LookupError, models::IdentityRecord, repository::IdentityLookup};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

/// Table layout for one identity category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityTable {
    name: String,
    has_designation: bool,
}

impl IdentityTable {
    pub fn patients() -> Self {
        Self::new("patients", false)
    }

    pub fn doctors() -> Self {
        Self::new("doctors", false)
    }

    pub fn staff() -> Self {
        Self::new("staff", true)
    }

    /// Custom table. `name` is interpolated into SQL and must be a trusted
    /// identifier: ASCII letters, digits, `_` and at most one `.` for a schema.
    pub fn new(name: impl Into<String>, has_designation: bool) -> Self {
        Self {
            name: name.into(),
            has_designation,
        }
    }

    fn is_valid_identifier(&self) -> bool {
        let mut parts = self.name.split('.');
        let valid = |part: &str| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        match (parts.next(), parts.next(), parts.next()) {
            (Some(table), None, None) => valid(table),
            (Some(schema), Some(table), None) => valid(schema) && valid(table),
            _ => false,
        }
    }

    fn select_by_email(&self) -> String {
        let designation = if self.has_designation {
            "designation"
        } else {
            "NULL::TEXT AS designation"
        };
        format!(
            "SELECT id, password_hash, is_active, {designation} FROM {} WHERE LOWER(email) = LOWER($1) LIMIT 1",
            self.name
        )
    }
}

/// PostgreSQL identity store for one category
pub struct PostgresIdentityLookup {
    pool: PgPool,
    table: IdentityTable,
    query: String,
}

impl PostgresIdentityLookup {
    /// # Errors
    ///
    /// Returns [`LookupError::Unavailable`] when the table name is not a plain identifier.
    pub fn new(pool: PgPool, table: IdentityTable) -> Result<Self, LookupError> {
        if !table.is_valid_identifier() {
            return Err(LookupError::Unavailable(format!(
                "invalid identity table name '{}'",
                table.name
            )));
        }
        let query = table.select_by_email();
        Ok(Self { pool, table, query })
    }

    /// # Errors
    ///
    /// Returns [`LookupError::Database`] when the connection cannot be established.
    pub async fn connect(connection_string: &str, table: IdentityTable) -> Result<Self, LookupError> {
        let pool = PgPool::connect(connection_string).await?;
        Self::new(pool, table)
    }
}

#[async_trait]
impl IdentityLookup for PostgresIdentityLookup {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, LookupError> {
        debug!(table = %self.table.name, "Looking up identity record");

        let row = sqlx::query(&self.query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<IdentityRecord, LookupError> {
            Ok(IdentityRecord {
                id: row.try_get("id")?,
                password_hash: row.try_get("password_hash")?,
                is_active: row.try_get("is_active")?,
                designation: row.try_get("designation")?,
            })
        })
        .transpose()
    }
}
