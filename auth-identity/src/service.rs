use crate::{config::*, error::*, hasher::*, models::*, repository::*};
use logger_redacted::PiiRedactor;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Resolves an email/password pair to exactly one (role, identifier) pair.
///
/// Patient, doctor and staff stores are probed in that order; the first
/// active record whose digest verifies wins. Staff records whose designation
/// is "Admin" resolve to [`Role::Admin`].
pub struct CredentialResolver {
    patients: Arc<dyn IdentityLookup>,
    doctors: Arc<dyn IdentityLookup>,
    staff: Arc<dyn IdentityLookup>,
    hasher: Arc<dyn PasswordHasher>,
    config: IdentityConfig,
    redactor: PiiRedactor,
}

impl CredentialResolver {
    pub fn new(
        patients: Arc<dyn IdentityLookup>,
        doctors: Arc<dyn IdentityLookup>,
        staff: Arc<dyn IdentityLookup>,
        hasher: Arc<dyn PasswordHasher>,
        config: IdentityConfig,
    ) -> Self {
        let redactor = if config.redact_emails_in_logs {
            PiiRedactor::default()
        } else {
            PiiRedactor::disabled()
        };

        Self {
            patients,
            doctors,
            staff,
            hasher,
            config,
            redactor,
        }
    }

    /// Resolver using the SHA-256 digest in the configured encoding.
    pub fn with_config(
        patients: Arc<dyn IdentityLookup>,
        doctors: Arc<dyn IdentityLookup>,
        staff: Arc<dyn IdentityLookup>,
        config: IdentityConfig,
    ) -> Self {
        let hasher = Arc::new(Sha256PasswordHasher::new(config.digest_encoding));
        Self::new(patients, doctors, staff, hasher, config)
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    fn lookup_for(&self, category: IdentityCategory) -> &dyn IdentityLookup {
        match category {
            IdentityCategory::Patient => self.patients.as_ref(),
            IdentityCategory::Doctor => self.doctors.as_ref(),
            IdentityCategory::Staff => self.staff.as_ref(),
        }
    }

    /// Resolve one login attempt.
    ///
    /// `Ok(ResolutionResult::InvalidCredential)` covers empty input, unknown
    /// email, inactive accounts and wrong passwords alike.
    ///
    /// # Errors
    ///
    /// [`IdentityError::LookupUnavailable`] when a store fails before a match
    /// was established, [`IdentityError::Timeout`] when the configured
    /// deadline elapses.
    pub async fn resolve(&self, email: &str, password: &str) -> Result<ResolutionResult> {
        let email_field = self.redactor.redact_email(email);

        if email.is_empty() || password.is_empty() {
            warn!(email = %email_field, "Login rejected: empty email or password");
            return Ok(ResolutionResult::InvalidCredential);
        }

        let probe = self.probe(email, password);
        let result = match self.config.resolve_timeout() {
            Some(deadline) => match tokio::time::timeout(deadline, probe).await {
                Ok(result) => result,
                Err(_) => Err(IdentityError::Timeout(deadline)),
            },
            None => probe.await,
        };

        match &result {
            Ok(ResolutionResult::Resolved(identity)) => {
                info!(email = %email_field, role = %identity.role, id = identity.id, "Login resolved");
            }
            Ok(ResolutionResult::InvalidCredential) => {
                warn!(email = %email_field, "Login rejected: no matching active credential");
            }
            Err(IdentityError::LookupUnavailable { category, source }) => {
                error!(email = %email_field, category = %category, error = %source, "Identity lookup failed");
            }
            Err(e) => {
                error!(email = %email_field, error = %e, "Credential resolution failed");
            }
        }

        result
    }

    /// # Errors
    ///
    /// Same as [`CredentialResolver::resolve`].
    pub async fn resolve_credential(&self, credential: &Credential) -> Result<ResolutionResult> {
        self.resolve(&credential.email, credential.password.expose_secret())
            .await
    }

    async fn probe(&self, email: &str, password: &str) -> Result<ResolutionResult> {
        match self.config.probe_strategy {
            ProbeStrategy::Sequential => self.probe_sequential(email, password).await,
            ProbeStrategy::Concurrent => self.probe_concurrent(email, password).await,
        }
    }

    async fn probe_sequential(&self, email: &str, password: &str) -> Result<ResolutionResult> {
        for category in IdentityCategory::PROBE_ORDER {
            let record = self
                .lookup_for(category)
                .find_by_email(email)
                .await
                .map_err(|e| IdentityError::lookup(category, e))?;

            if let Some(identity) = self.verify_candidate(category, record, password) {
                return Ok(ResolutionResult::Resolved(identity));
            }
        }

        Ok(ResolutionResult::InvalidCredential)
    }

    /// Issues all lookups at once but settles them in probe order, so the
    /// answer (and which error surfaces) matches the sequential probe.
    ///
    /// Outcomes that arrive early are parked until every earlier category is
    /// settled. Once a category verifies, the lookups still in flight are
    /// dropped without being awaited.
    async fn probe_concurrent(&self, email: &str, password: &str) -> Result<ResolutionResult> {
        let mut patient = self.patients.find_by_email(email);
        let mut doctor = self.doctors.find_by_email(email);
        let mut staff = self.staff.find_by_email(email);

        let (mut patient_done, mut doctor_done, mut staff_done) = (false, false, false);
        let (mut patient_out, mut doctor_out, mut staff_out) = (None, None, None);

        for category in IdentityCategory::PROBE_ORDER {
            // The current category's lookup is still pending whenever its slot
            // is empty, so at least one branch below stays enabled.
            let outcome = loop {
                let parked = match category {
                    IdentityCategory::Patient => patient_out.take(),
                    IdentityCategory::Doctor => doctor_out.take(),
                    IdentityCategory::Staff => staff_out.take(),
                };
                if let Some(outcome) = parked {
                    break outcome;
                }

                tokio::select! {
                    outcome = &mut patient, if !patient_done => {
                        patient_done = true;
                        patient_out = Some(outcome);
                    }
                    outcome = &mut doctor, if !doctor_done => {
                        doctor_done = true;
                        doctor_out = Some(outcome);
                    }
                    outcome = &mut staff, if !staff_done => {
                        staff_done = true;
                        staff_out = Some(outcome);
                    }
                }
            };

            let record = outcome.map_err(|e| IdentityError::lookup(category, e))?;
            if let Some(identity) = self.verify_candidate(category, record, password) {
                return Ok(ResolutionResult::Resolved(identity));
            }
        }

        Ok(ResolutionResult::InvalidCredential)
    }

    fn verify_candidate(
        &self,
        category: IdentityCategory,
        record: Option<IdentityRecord>,
        password: &str,
    ) -> Option<AuthenticatedIdentity> {
        let Some(record) = record else {
            debug!(category = %category, "No record");
            return None;
        };

        // Inactive accounts are skipped before any digest comparison.
        if !record.is_active {
            debug!(category = %category, id = record.id, "Inactive record skipped");
            return None;
        }

        if !self.hasher.verify(password, &record.password_hash) {
            debug!(category = %category, id = record.id, "Password mismatch");
            return None;
        }

        Some(AuthenticatedIdentity::new(category.role_for(&record), record.id))
    }
}
