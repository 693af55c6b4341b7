//! Credential store for subject records.
//!
//! This crate defines the store contract the token service depends on,
//! a MySQL backend using sqlx, and an in-memory backend for tests and
//! local development.

mod config;
mod memory;
mod mysql;
mod store;

pub use config::DbConfig;
pub use memory::InMemoryStore;
pub use mysql::{DbPool, MySqlStore};
pub use store::{CredentialStore, NewSubject, SubjectRecord};
