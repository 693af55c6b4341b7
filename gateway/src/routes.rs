//! HTTP routes.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use db::SubjectRecord;
use serde::Serialize;

use crate::api_error::ApiError;
use crate::middleware::require_bearer;
use crate::state::AppState;

/// Body returned by the protected resources.
#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub message: String,
    pub user: SubjectRecord,
}

/// Build the gateway router.
///
/// `/token/:name` and `/health` are public; everything under `/api` passes
/// through [`require_bearer`].
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/admin", get(resource))
        .route("/api/vendedor", get(resource))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/token/:name", get(issue_token))
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
}

/// Create a subject named `name` and return its token as plain text.
async fn issue_token(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<String, ApiError> {
    Ok(state.tokens.issue(&name).await?)
}

async fn resource(uri: Uri, Extension(user): Extension<SubjectRecord>) -> Json<ResourceResponse> {
    let name = auth::resource_of(uri.path()).unwrap_or_default();
    Json(ResourceResponse {
        message: format!("Hello {}", name),
        user,
    })
}

/// Liveness plus a credential store ping.
async fn health(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.tokens.store_health().await?;
    Ok("ok")
}
