//! Gateway configuration.

use std::time::Duration;

use auth::{JwtConfig, Role, DEFAULT_STORE_TIMEOUT};
use db::DbConfig;
use error::ConfigError;

/// Which credential store backs the gateway.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// MySQL through a sqlx pool
    MySql(DbConfig),
    /// Process-local map; records are lost on restart
    Memory,
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// HTTP listen address
    pub http_addr: String,

    /// Token signing settings
    pub jwt: JwtConfig,

    /// Credential store backend
    pub store: StoreBackend,

    /// Bound on each credential store call, in seconds
    pub store_timeout_secs: u64,

    /// Role assigned to subjects created by the issuance endpoint
    pub default_role: Role,

    /// Service version
    pub version: String,
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt = JwtConfig::from_lookup(&lookup)?;

        let store = match lookup("STORE_BACKEND").as_deref() {
            None | Some("mysql") => StoreBackend::MySql(DbConfig::from_lookup(&lookup)?),
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidVar {
                    name: "STORE_BACKEND".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let store_timeout_secs = match lookup("STORE_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or(ConfigError::InvalidVar {
                    name: "STORE_TIMEOUT_SECS".to_string(),
                    value,
                })?,
            None => DEFAULT_STORE_TIMEOUT.as_secs(),
        };

        let default_role = match lookup("DEFAULT_ROLE") {
            Some(value) => Role::parse(&value).ok_or(ConfigError::InvalidVar {
                name: "DEFAULT_ROLE".to_string(),
                value,
            })?,
            None => Role::Vendedor,
        };

        Ok(Self {
            http_addr: lookup("HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            jwt,
            store,
            store_timeout_secs,
            default_role,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Get store timeout as Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
