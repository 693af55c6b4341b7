//! Credential store contract.

use async_trait::async_trait;
use error::DatabaseError;
use serde::{Deserialize, Serialize};

/// A stored subject, identified by a store-assigned key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Store-native unique key, opaque to callers
    pub id: String,
    /// Name given at issuance
    pub display_name: String,
    /// Role name as stored; not validated here
    pub role: String,
}

/// Fields supplied when creating a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    pub display_name: String,
    pub role: String,
}

impl NewSubject {
    pub fn new(display_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role: role.into(),
        }
    }
}

/// Persistence for subject records, shared by all request handlers.
///
/// Implementations must fail with [`DatabaseError::Unavailable`] once the
/// backend is unreachable instead of blocking. A key that the backend could
/// never have produced is reported as [`DatabaseError::InvalidId`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a subject and return its new key.
    async fn insert(&self, subject: NewSubject) -> Result<String, DatabaseError>;

    /// Look up a subject by key; `Ok(None)` when no such record exists.
    async fn lookup(&self, id: &str) -> Result<Option<SubjectRecord>, DatabaseError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
