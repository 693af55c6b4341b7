//! Role-based authorization over API resource paths.

use std::collections::{HashMap, HashSet};
use std::fmt;

use error::AuthError;
use serde::{Deserialize, Serialize};

/// Path prefix in front of every protected resource.
pub const API_PREFIX: &str = "/api";

/// Known subject roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access
    Admin,
    /// Sales access
    Vendedor,
}

impl Role {
    /// Returns the role name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendedor => "vendedor",
        }
    }

    /// Parses a stored role name. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "vendedor" => Some(Role::Vendedor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protected resources, named by the first path segment after [`API_PREFIX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Admin,
    Vendedor,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Admin => "admin",
            Resource::Vendedor => "vendedor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Resource::Admin),
            "vendedor" => Some(Resource::Vendedor),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Static role to permitted-resource table.
///
/// Built once at startup and shared read-only (wrap it in an `Arc`); it has
/// no interior mutability, so concurrent checks need no locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    permitted: HashMap<Role, HashSet<Resource>>,
}

impl RolePolicy {
    /// Policy that denies everything.
    pub fn empty() -> Self {
        Self {
            permitted: HashMap::new(),
        }
    }

    /// Allow `role` to access `resources`, in addition to existing grants.
    pub fn grant(mut self, role: Role, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.permitted.entry(role).or_default().extend(resources);
        self
    }

    /// Whether `role` may access `resource`.
    pub fn permits(&self, role: Role, resource: Resource) -> bool {
        self.permitted
            .get(&role)
            .is_some_and(|resources| resources.contains(&resource))
    }

    /// Decide whether a subject with the stored role name may access `path`.
    ///
    /// Unknown roles, paths outside [`API_PREFIX`] and unknown resources
    /// are all denied.
    pub fn authorize(&self, role: &str, path: &str) -> Decision {
        match Role::parse(role) {
            Some(role) => self.authorize_role(role, path),
            None => Decision::Deny,
        }
    }

    /// Same as [`RolePolicy::authorize`] for an already-parsed role.
    pub fn authorize_role(&self, role: Role, path: &str) -> Decision {
        match resource_of(path).and_then(Resource::parse) {
            Some(resource) if self.permits(role, resource) => Decision::Allow,
            _ => Decision::Deny,
        }
    }

    /// [`RolePolicy::authorize`] as a `Result` for `?` chains.
    pub fn check(&self, role: &str, path: &str) -> Result<(), AuthError> {
        match self.authorize(role, path) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AuthError::AuthorizationDenied),
        }
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::empty()
            .grant(Role::Admin, [Resource::Admin, Resource::Vendedor])
            .grant(Role::Vendedor, [Resource::Vendedor])
    }
}

/// First path segment after [`API_PREFIX`], ignoring any query string.
pub fn resource_of(path: &str) -> Option<&str> {
    let path = path.split('?').next().unwrap_or_default();
    let rest = path.strip_prefix(API_PREFIX)?.strip_prefix('/')?;
    rest.split('/').next().filter(|segment| !segment.is_empty())
}
