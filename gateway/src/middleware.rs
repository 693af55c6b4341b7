//! Bearer authentication and role authorization middleware.
//!
//! Extracts the token from `Authorization: Bearer <token>`, resolves its
//! subject through the token service, checks the subject's role against the
//! request path and stores the [`SubjectRecord`] in request extensions.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use db::SubjectRecord;
use error::AuthError;

use crate::api_error::ApiError;
use crate::state::AppState;

/// Middleware guarding the protected API routes.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let subject: SubjectRecord = state.tokens.verify(token).await?;

    let path = request.uri().path();
    state.policy.check(&subject.role, path).inspect_err(|_| {
        tracing::info!(
            subject = %subject.id,
            role = %subject.role,
            path = %path,
            "Role not permitted for resource"
        )
    })?;

    request.extensions_mut().insert(subject);
    Ok(next.run(request).await)
}

/// Pull the token out of an `Authorization` header.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(AuthError::MissingCredentials)
            } else {
                Ok(token)
            }
        }
        _ => Err(AuthError::MissingCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer   abc")), Ok("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_forms() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingCredentials));
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "abc.def.ghi"] {
            assert_eq!(
                bearer_token(&headers(value)),
                Err(AuthError::MissingCredentials),
                "{value}"
            );
        }
    }
}
