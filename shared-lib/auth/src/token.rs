//! JWT encoding and decoding utilities.

use error::{AppError, AuthError, ConfigError};
use hmac::{Hmac, Mac};
use jwt::header::HeaderType;
use jwt::{AlgorithmType, Header, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::claims::{Claims, DEFAULT_EXPIRES_IN_SECS, MAX_EXPIRES_IN_SECS};

/// HMAC-SHA256 signing key.
pub type HmacSha256 = Hmac<Sha256>;

/// JWT configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token validity duration in seconds
    pub expires_in_secs: i64,
}

impl JwtConfig {
    /// Create a new JWT configuration.
    pub fn new(secret: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            expires_in_secs,
        }
    }

    /// Read `JWT_SECRET` (required) and `TOKEN_TTL_SECS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`JwtConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let expires_in_secs = match lookup("TOKEN_TTL_SECS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|secs: &i64| (1..=MAX_EXPIRES_IN_SECS).contains(secs))
                .ok_or(ConfigError::InvalidVar {
                    name: "TOKEN_TTL_SECS".to_string(),
                    value,
                })?,
            None => DEFAULT_EXPIRES_IN_SECS,
        };

        Ok(Self::new(secret, expires_in_secs))
    }

    /// Build the HMAC key, failing if no secret is configured.
    pub fn signing_key(&self) -> Result<HmacSha256, ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingVar("JWT_SECRET".to_string()));
        }
        HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|_| ConfigError::InvalidVar {
            name: "JWT_SECRET".to_string(),
            value: "<redacted>".to_string(),
        })
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Encode claims into a compact JWT with an `HS256`/`JWT` header.
pub fn encode_token(claims: &Claims, key: &HmacSha256) -> Result<String, AppError> {
    let header = Header {
        algorithm: AlgorithmType::Hs256,
        type_: Some(HeaderType::JsonWebToken),
        ..Default::default()
    };

    let token = Token::new(header, claims).sign_with_key(key).map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        AppError::Internal("token signing failed".to_string())
    })?;

    Ok(token.as_str().to_string())
}

/// Decode a JWT, checking its signature and expiry against `now`.
///
/// Every failure collapses to [`AuthError::TokenInvalid`]; the cause is only
/// logged at debug level.
pub fn decode_token(token: &str, key: &HmacSha256, now: i64) -> Result<Claims, AuthError> {
    let verified: Token<Header, Claims, _> = token.verify_with_key(key).map_err(|e| {
        tracing::debug!("Rejected JWT: {}", e);
        AuthError::TokenInvalid
    })?;

    let claims = verified.claims();
    if claims.is_expired_at(now) {
        tracing::debug!("Rejected JWT: expired at {} (now {})", claims.exp, now);
        return Err(AuthError::TokenInvalid);
    }

    Ok(claims.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn key(secret: &str) -> HmacSha256 {
        JwtConfig::new(secret, DEFAULT_EXPIRES_IN_SECS).signing_key().unwrap()
    }

    #[test]
    fn test_encode_decode_token() {
        let key = key("test-secret-key");
        let claims = Claims::new("user123", 1_700_000_000, 3600).unwrap();

        let token = encode_token(&claims, &key).expect("Failed to encode");
        let decoded = decode_token(&token, &key, 1_700_000_010).expect("Failed to decode");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_header_declares_algorithm_and_type() {
        let token = encode_token(&Claims::new("1", 0, 60).unwrap(), &key("s")).unwrap();
        let header = token.split('.').next().unwrap();
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();

        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_payload_carries_id_iat_exp() {
        let token = encode_token(&Claims::new("abc", 10, 60).unwrap(), &key("s")).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let payload: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(payload["id"], "abc");
        assert_eq!(payload["iat"], 10);
        assert_eq!(payload["exp"], 70);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_token(&Claims::new("1", 0, 60).unwrap(), &key("secret-a")).unwrap();
        assert_eq!(
            decode_token(&token, &key("secret-b"), 1),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let key = key("s");
        let token = encode_token(&Claims::new("1", 0, 60).unwrap(), &key).unwrap();
        assert!(decode_token(&token, &key, 59).is_ok());
        assert_eq!(decode_token(&token, &key, 60), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_garbage_rejected() {
        let key = key("s");
        for token in ["", "abc", "a.b.c", "..", "eyJhbGciOiJIUzI1NiJ9.e30."] {
            assert_eq!(decode_token(token, &key, 0), Err(AuthError::TokenInvalid));
        }
    }

    #[test]
    fn test_from_lookup() {
        let config = JwtConfig::from_lookup(|name| match name {
            "JWT_SECRET" => Some("s3cret".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.expires_in_secs, DEFAULT_EXPIRES_IN_SECS);

        let err = JwtConfig::from_lookup(|name| match name {
            "JWT_SECRET" => Some("s3cret".to_string()),
            "TOKEN_TTL_SECS" => Some("-5".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { .. }));

        let huge = i64::MAX.to_string();
        let err = JwtConfig::from_lookup(|name| match name {
            "JWT_SECRET" => Some("s3cret".to_string()),
            "TOKEN_TTL_SECS" => Some(huge.clone()),
            _ => None,
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidVar {
                name: "TOKEN_TTL_SECS".into(),
                value: huge,
            }
        );

        assert_eq!(
            JwtConfig::from_lookup(|_| None).unwrap_err(),
            ConfigError::MissingVar("JWT_SECRET".into())
        );
    }

    #[test]
    fn test_missing_secret() {
        let err = JwtConfig::new("", 3600).signing_key().err().unwrap();
        assert_eq!(err, ConfigError::MissingVar("JWT_SECRET".into()));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::new("hunter2", 3600));
        assert!(!rendered.contains("hunter2"));
    }
}
