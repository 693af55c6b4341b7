//! Database configuration.

use error::ConfigError;
use serde::{Deserialize, Serialize};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database name
    pub database: String,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    /// Create a new database configuration.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Read the configuration from `DB_*` environment variables.
    ///
    /// `DB_HOST`, `DB_NAME` and `DB_USER` are required; the rest fall back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`DbConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
        };
        let parsed = |name: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                    name: name.to_string(),
                    value,
                }),
                None => Ok(default),
            }
        };

        let defaults = Self::default();
        let port = parsed("DB_PORT", defaults.port as u64)?;
        let port = u16::try_from(port).map_err(|_| ConfigError::InvalidVar {
            name: "DB_PORT".to_string(),
            value: port.to_string(),
        })?;

        let max_connections = parsed("DB_MAX_CONNECTIONS", defaults.max_connections as u64)?;
        let max_connections = u32::try_from(max_connections)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidVar {
                name: "DB_MAX_CONNECTIONS".to_string(),
                value: max_connections.to_string(),
            })?;

        Ok(Self {
            host: required("DB_HOST")?,
            port,
            database: required("DB_NAME")?,
            username: required("DB_USER")?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            max_connections,
            min_connections: defaults.min_connections,
            connect_timeout_secs: parsed("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs)?,
        })
    }

    /// Build the connection URL.
    pub fn connection_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "oauth_bearer".to_string(),
            username: "root".to_string(),
            password: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 5,
        }
    }
}
