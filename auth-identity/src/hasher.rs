//! Password digests.
//!
//! Stored digests are unsalted SHA-256, the format already persisted by the
//! clinic record stores. Identical passwords share a digest.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Text encoding of a stored digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    /// 64 lowercase hex characters
    #[default]
    Hex,
    /// Standard alphabet, padded
    Base64,
}

pub trait PasswordHasher: Send + Sync {
    /// Deterministic digest of `password`.
    fn hash(&self, password: &str) -> String;

    /// True iff `hash(password)` equals `stored_digest` exactly.
    fn verify(&self, password: &str, stored_digest: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordHasher {
    encoding: DigestEncoding,
}

impl Sha256PasswordHasher {
    pub fn new(encoding: DigestEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> DigestEncoding {
        self.encoding
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let digest = Sha256::digest(password.as_bytes());
        match self.encoding {
            DigestEncoding::Hex => format!("{digest:x}"),
            DigestEncoding::Base64 => general_purpose::STANDARD.encode(digest),
        }
    }

    fn verify(&self, password: &str, stored_digest: &str) -> bool {
        let computed = self.hash(password);
        // Digest match only; the raw password is never compared with the stored value.
        computed.as_bytes().ct_eq(stored_digest.as_bytes()).into()
    }
}
