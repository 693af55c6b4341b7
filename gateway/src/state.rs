//! Application state shared across handlers.

use std::sync::Arc;

use auth::{RolePolicy, TokenService};

/// Shared handles; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Token issuance and verification
    pub tokens: Arc<TokenService>,
    /// Read-only role table, built at startup
    pub policy: Arc<RolePolicy>,
}

impl AppState {
    pub fn new(tokens: TokenService, policy: RolePolicy) -> Self {
        Self {
            tokens: Arc::new(tokens),
            policy: Arc::new(policy),
        }
    }
}
