//! In-memory credential store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use error::DatabaseError;
use uuid::Uuid;

use crate::store::{CredentialStore, NewSubject, SubjectRecord};

/// Credential store backed by a `HashMap`.
///
/// Keys are UUID v4 strings. `remove` and `set_available` exist so tests can
/// simulate retention purges and lost connectivity.
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, SubjectRecord>>,
    available: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Delete a record, returning whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    /// Toggle simulated connectivity.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> Result<(), DatabaseError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Unavailable("in-memory store disconnected".into()))
        }
    }

    // A poisoned lock still holds consistent data: every write is a single insert/remove.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SubjectRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SubjectRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn insert(&self, subject: NewSubject) -> Result<String, DatabaseError> {
        self.ensure_available()?;
        let id = Uuid::new_v4().to_string();
        let record = SubjectRecord {
            id: id.clone(),
            display_name: subject.display_name,
            role: subject.role,
        };
        self.write().insert(id.clone(), record);
        Ok(id)
    }

    async fn lookup(&self, id: &str) -> Result<Option<SubjectRecord>, DatabaseError> {
        self.ensure_available()?;
        Ok(self.read().get(id).cloned())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.ensure_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = InMemoryStore::new();
        let id = store.insert(NewSubject::new("alice", "vendedor")).await.unwrap();

        let found = store.lookup(&id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.display_name, "alice");
        assert_eq!(found.role, "vendedor");
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryStore::new();
        let a = store.insert(NewSubject::new("alice", "vendedor")).await.unwrap();
        let b = store.insert(NewSubject::new("alice", "vendedor")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_makes_lookup_absent() {
        let store = InMemoryStore::new();
        let id = store.insert(NewSubject::new("bob", "admin")).await.unwrap();

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.lookup(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_operation() {
        let store = InMemoryStore::new();
        let id = store.insert(NewSubject::new("carol", "admin")).await.unwrap();
        store.set_available(false);

        assert!(matches!(store.lookup(&id).await, Err(DatabaseError::Unavailable(_))));
        assert!(matches!(
            store.insert(NewSubject::new("dave", "admin")).await,
            Err(DatabaseError::Unavailable(_))
        ));

        assert!(store.ping().await.is_err());

        store.set_available(true);
        assert!(store.ping().await.is_ok());
        assert!(store.lookup(&id).await.unwrap().is_some());
    }
}
