//! Token issuance and verification.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use db::{CredentialStore, NewSubject, SubjectRecord};
use error::{AppError, AuthError, ConfigError, DatabaseError};

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::policy::Role;
use crate::token::{decode_token, encode_token, HmacSha256, JwtConfig};

/// Default bound on a single credential store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of checking a token, before it is collapsed into an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Signature and expiry are good and the subject exists.
    Resolved(SubjectRecord),
    /// Signature and expiry are good but the store has no such subject.
    ValidAbsent { id: String },
    /// Bad signature, malformed token, or expired.
    Invalid,
}

/// Issues and verifies bearer tokens bound to credential store records.
///
/// Holds no mutable state; share it behind an `Arc` between handlers.
#[derive(Clone)]
pub struct TokenService {
    key: HmacSha256,
    expires_in_secs: i64,
    default_role: Role,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl TokenService {
    /// Create a service over `store`.
    ///
    /// Fails with [`ConfigError`] when the signing secret is missing.
    pub fn new(config: &JwtConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ConfigError> {
        Ok(Self {
            key: config.signing_key()?,
            expires_in_secs: config.expires_in_secs,
            default_role: Role::Vendedor,
            store,
            clock: Arc::new(SystemClock),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Role given to subjects created through [`TokenService::issue`].
    pub fn with_default_role(mut self, role: Role) -> Self {
        self.default_role = role;
        self
    }

    /// Create a subject with the default role and return a signed token for it.
    pub async fn issue(&self, display_name: &str) -> Result<String, AppError> {
        self.issue_with_role(display_name, self.default_role).await
    }

    /// Create a subject with an explicit role and return a signed token for it.
    pub async fn issue_with_role(&self, display_name: &str, role: Role) -> Result<String, AppError> {
        if display_name.trim().is_empty() {
            return Err(AppError::Validation("display name must not be empty".to_string()));
        }

        // Expiry is computed before the insert so a bad lifetime leaves no record behind.
        let mut claims = Claims::new(String::new(), self.clock.now(), self.expires_in_secs)
            .ok_or_else(|| {
                tracing::error!("Token lifetime {}s overflows the expiry", self.expires_in_secs);
                AppError::Internal("token lifetime out of range".to_string())
            })?;

        let subject = NewSubject::new(display_name, role.as_str());
        claims.id = self.with_timeout("insert", self.store.insert(subject)).await?;

        let token = encode_token(&claims, &self.key)?;
        tracing::info!("Issued token for subject {} (role {})", claims.id, role);
        Ok(token)
    }

    /// Classify a token without collapsing the outcome.
    ///
    /// Only store failures are errors; every token problem is a
    /// [`Verification`] variant. Expired or forged tokens never reach the
    /// store.
    pub async fn check(&self, token: &str) -> Result<Verification, DatabaseError> {
        let claims = match decode_token(token, &self.key, self.clock.now()) {
            Ok(claims) => claims,
            Err(_) => return Ok(Verification::Invalid),
        };

        match self.with_timeout("lookup", self.store.lookup(&claims.id)).await {
            Ok(Some(record)) => Ok(Verification::Resolved(record)),
            Ok(None) => Ok(Verification::ValidAbsent { id: claims.id }),
            Err(DatabaseError::InvalidId(id)) => {
                tracing::debug!("Rejected JWT: malformed subject id {:?}", id);
                Ok(Verification::Invalid)
            }
            Err(e) => Err(e),
        }
    }

    /// Verify a token and resolve its subject.
    ///
    /// Invalid tokens yield [`AuthError::TokenInvalid`] and missing subjects
    /// [`AuthError::SubjectAbsent`]; store failures pass through.
    pub async fn verify(&self, token: &str) -> Result<SubjectRecord, AppError> {
        match self.check(token).await? {
            Verification::Resolved(record) => Ok(record),
            Verification::ValidAbsent { id } => {
                tracing::warn!("Valid token references missing subject {}", id);
                Err(AuthError::SubjectAbsent.into())
            }
            Verification::Invalid => Err(AuthError::TokenInvalid.into()),
        }
    }

    /// Ping the credential store under the same timeout as other calls.
    pub async fn store_health(&self) -> Result<(), DatabaseError> {
        self.with_timeout("ping", self.store.ping()).await
    }

    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, DatabaseError>>,
    ) -> Result<T, DatabaseError> {
        match tokio::time::timeout(self.store_timeout, fut).await {
            // A malformed id is the caller's problem, not the store's.
            Ok(result) => result.inspect_err(|e| {
                if !matches!(e, DatabaseError::InvalidId(_)) {
                    tracing::error!("Credential store {} failed: {}", operation, e);
                }
            }),
            Err(_) => {
                tracing::error!(
                    "Credential store {} timed out after {:?}",
                    operation,
                    self.store_timeout
                );
                Err(DatabaseError::Unavailable(format!("{} timed out", operation)))
            }
        }
    }
}
