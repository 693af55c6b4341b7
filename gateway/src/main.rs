//! Gateway main entry point
//!
//! Serves the token issuance endpoint and the role-protected API routes.

use std::sync::Arc;

use anyhow::Context;
use auth::{RolePolicy, TokenService};
use db::{CredentialStore, InMemoryStore, MySqlStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::{build_router, AppState, GatewayConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,auth=info,db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Gateway v{}", config.version);

    let store = connect_store(&config).await?;
    let tokens = TokenService::new(&config.jwt, store)?
        .with_default_role(config.default_role)
        .with_store_timeout(config.store_timeout());
    let state = AppState::new(tokens, RolePolicy::default());

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Open the configured credential store once; the handle is shared by all requests.
async fn connect_store(config: &GatewayConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    match &config.store {
        StoreBackend::MySql(db_config) => Ok(Arc::new(MySqlStore::connect(db_config).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory credential store; subjects are lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
