//! Credential validation and role resolution for ClinicCare
//!
//! A login is an email and a password. This crate decides whether that pair
//! belongs to a patient, a doctor, a staff member or an administrator:
//!
//! - Patient, doctor and staff stores are probed in that fixed order
//! - Inactive records never authenticate
//! - Passwords are checked against unsalted SHA-256 digests
//! - Staff with the designation "Admin" (any case) resolve to [`Role::Admin`]
//! - The outcome is a single (role, identifier) pair, never a bare id
//!
//! Unknown email, wrong password and inactive account are indistinguishable
//! to the caller. Store failures are errors, not rejections.
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{
//!     CredentialResolver, IdentityConfig, IdentityRecord, InMemoryIdentityLookup,
//!     PasswordHasher, ResolutionResult, Role, Sha256PasswordHasher,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hasher = Sha256PasswordHasher::default();
//!     let patients = InMemoryIdentityLookup::new();
//!     patients.insert("pat@x.com", IdentityRecord::new(1, hasher.hash("secret")));
//!
//!     let resolver = CredentialResolver::with_config(
//!         Arc::new(patients),
//!         Arc::new(InMemoryIdentityLookup::new()),
//!         Arc::new(InMemoryIdentityLookup::new()),
//!         IdentityConfig::default(),
//!     );
//!
//!     let result = resolver.resolve("pat@x.com", "secret").await?;
//!     assert_eq!(result.role(), Some(Role::Patient));
//!     assert_eq!(resolver.resolve("pat@x.com", "wrong").await?, ResolutionResult::InvalidCredential);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod hasher;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use config::*;
pub use error::*;
pub use handlers::*;
pub use hasher::*;
pub use models::*;
pub use postgres::*;
pub use repository::*;
pub use service::*;
