//! HTTP mapping for application errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error::{AppError, AuthError, DatabaseError, ErrorResponse};

/// Handler error; wraps [`AppError`] so it can become a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    ///
    /// Authentication failures are 401 and authorization failures 403; the
    /// two never share a status.
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::Auth(AuthError::AuthorizationDenied) => StatusCode::FORBIDDEN,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(DatabaseError::InvalidId(_)) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(error = %self.0, status = %status, "Authentication failed");
        } else if status.is_server_error() {
            tracing::error!(error = %self.0, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Client error");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::from(AuthError::TokenInvalid), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::SubjectAbsent), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::MissingCredentials), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::AuthorizationDenied), StatusCode::FORBIDDEN),
            (
                ApiError::from(DatabaseError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::from(AppError::Validation("empty".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{:?}", err);
        }
    }
}
