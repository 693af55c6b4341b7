//! Gateway library
//!
//! This module exposes the HTTP surface as a library so the router can be
//! driven in-process by tests.

pub mod api_error;
pub mod config;
pub mod middleware;
pub mod routes;
pub mod state;

pub use api_error::ApiError;
pub use config::{GatewayConfig, StoreBackend};
pub use routes::build_router;
pub use state::AppState;
