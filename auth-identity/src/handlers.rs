// Login boundary for the session layer.
// Turns a resolution into the response a web framework would serialise and
// into the identity it should store; transport stays with the caller.

use crate::{error::*, models::*, service::CredentialResolver};
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Shown for every rejected login, whatever the reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

pub struct LoginHandler {
    resolver: Arc<CredentialResolver>,
}

impl LoginHandler {
    pub fn new(resolver: Arc<CredentialResolver>) -> Self {
        Self { resolver }
    }

    /// # Errors
    ///
    /// Infrastructure failures from [`CredentialResolver::resolve`] propagate
    /// unchanged so the caller can answer "try again later" instead of
    /// "access denied".
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let result = self
            .resolver
            .resolve(&request.email, request.password.expose_secret())
            .await?;
        Ok(LoginResponse::from(result))
    }

    /// Same as [`LoginHandler::login`], rendered as JSON.
    ///
    /// # Errors
    ///
    /// See [`LoginHandler::login`]; [`IdentityError::Serialization`] if the
    /// response cannot be rendered.
    pub async fn login_json(&self, request: LoginRequest) -> Result<serde_json::Value> {
        let response = self.login(request).await?;
        Ok(serde_json::to_value(response)?)
    }
}

impl From<ResolutionResult> for LoginResponse {
    fn from(result: ResolutionResult) -> Self {
        match result {
            ResolutionResult::Resolved(identity) => Self {
                success: true,
                role: Some(identity.role),
                identifier: Some(identity.id),
                session_key: Some(identity.session_key()),
                message: None,
            },
            ResolutionResult::InvalidCredential => Self {
                success: false,
                role: None,
                identifier: None,
                session_key: None,
                message: Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
            },
        }
    }
}

impl LoginResponse {
    /// Identity to hand to downstream operations, if the login succeeded.
    ///
    /// # Errors
    ///
    /// [`IdentityError::InvalidIdentityKey`] when a successful response carries
    /// a malformed session key.
    pub fn identity(&self) -> Result<Option<AuthenticatedIdentity>> {
        match (&self.session_key, self.success) {
            (Some(key), true) => key.parse().map(Some),
            _ => Ok(None),
        }
    }
}
