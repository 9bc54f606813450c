use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Role tag attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Staff,
    Admin,
}

impl Role {
    const ADMIN_DESIGNATION: &'static str = "Admin";

    /// Map a staff record's designation to its role.
    ///
    /// `"Admin"` in any letter case is [`Role::Admin`]; everything else,
    /// including the empty string and padded variants, is [`Role::Staff`].
    pub fn from_staff_designation(designation: &str) -> Self {
        if designation.eq_ignore_ascii_case(Self::ADMIN_DESIGNATION) {
            Self::Admin
        } else {
            Self::Staff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Patient, Self::Doctor, Self::Staff, Self::Admin]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| IdentityError::InvalidIdentityKey(format!("unknown role '{s}'")))
    }
}

/// Identity store probed during resolution. Admins live in the staff store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityCategory {
    Patient,
    Doctor,
    Staff,
}

impl IdentityCategory {
    /// Fixed precedence: the first category that verifies wins.
    pub const PROBE_ORDER: [IdentityCategory; 3] = [Self::Patient, Self::Doctor, Self::Staff];

    /// Role granted by a verified record of this category.
    pub fn role_for(self, record: &IdentityRecord) -> Role {
        match self {
            Self::Patient => Role::Patient,
            Self::Doctor => Role::Doctor,
            Self::Staff => Role::from_staff_designation(record.designation.as_deref().unwrap_or("")),
        }
    }
}

impl fmt::Display for IdentityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Staff => "staff",
        })
    }
}

/// Stored login data for one patient, doctor or staff member.
///
/// Owned by the respective store; the resolver only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: i64,
    pub password_hash: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Job designation; only meaningful for staff records.
    #[serde(default)]
    pub designation: Option<String>,
}

fn default_active() -> bool {
    true
}

impl IdentityRecord {
    pub fn new(id: i64, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            password_hash: password_hash.into(),
            is_active: true,
            designation: None,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }
}

/// Login attempt as submitted. Lives for one request.
#[derive(Debug, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: SecretString,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }
}

/// The system-wide identity key: identifiers are only unique within a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub role: Role,
    pub id: i64,
}

impl AuthenticatedIdentity {
    pub fn new(role: Role, id: i64) -> Self {
        Self { role, id }
    }

    /// `"<role>:<id>"`, suitable for a session store. Parse back with `str::parse`.
    pub fn session_key(&self) -> String {
        format!("{}:{}", self.role, self.id)
    }

    pub fn patient_id(&self) -> Option<i64> {
        (self.role == Role::Patient).then_some(self.id)
    }

    pub fn doctor_id(&self) -> Option<i64> {
        (self.role == Role::Doctor).then_some(self.id)
    }

    /// Staff record id; admins are staff records too.
    pub fn staff_id(&self) -> Option<i64> {
        matches!(self.role, Role::Staff | Role::Admin).then_some(self.id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Display for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

impl FromStr for AuthenticatedIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, id) = s
            .split_once(':')
            .ok_or_else(|| IdentityError::InvalidIdentityKey(format!("missing ':' in '{s}'")))?;
        let id = id
            .parse::<i64>()
            .map_err(|e| IdentityError::InvalidIdentityKey(format!("bad identifier '{id}': {e}")))?;
        Ok(Self::new(role.parse()?, id))
    }
}

/// Outcome of one resolution. Deliberately says nothing about which part
/// of a rejected credential was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionResult {
    Resolved(AuthenticatedIdentity),
    InvalidCredential,
}

impl ResolutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn identity(&self) -> Option<AuthenticatedIdentity> {
        match self {
            Self::Resolved(identity) => Some(*identity),
            Self::InvalidCredential => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn identifier(&self) -> Option<i64> {
        self.identity().map(|identity| identity.id)
    }
}

#[derive(Serialize)]
struct ResolutionResultRepr {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<i64>,
}

impl Serialize for ResolutionResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResolutionResultRepr {
            success: self.is_success(),
            role: self.role(),
            identifier: self.identifier(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
