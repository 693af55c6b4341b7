//! JWT claims.

use serde::{Deserialize, Serialize};

/// Default token lifetime: one hour.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Longest accepted token lifetime: one hundred years.
pub const MAX_EXPIRES_IN_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Credential store key of the subject
    pub id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject issued at `now`.
    ///
    /// Returns `None` when the expiry does not fit in a Unix timestamp.
    pub fn new(id: impl Into<String>, now: i64, expires_in_secs: i64) -> Option<Self> {
        Some(Self {
            id: id.into(),
            iat: now,
            exp: now.checked_add(expires_in_secs)?,
        })
    }

    /// Check if the claims have expired at `now`.
    ///
    /// A token stops being valid at the exact second of `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new("42", 1_000, DEFAULT_EXPIRES_IN_SECS).unwrap();

        assert_eq!(claims.exp, 4_600);
        assert!(!claims.is_expired_at(1_000));
        assert!(!claims.is_expired_at(4_599));
        assert!(claims.is_expired_at(4_600));
    }

    #[test]
    fn test_overflowing_expiry() {
        assert_eq!(Claims::new("42", 1_000, i64::MAX), None);
        assert!(Claims::new("42", 1_700_000_000, MAX_EXPIRES_IN_SECS).is_some());
    }
}
