//! Collections API server binary.
//!
//! Environment:
//! - `COLLECTIONS_HOST` / `COLLECTIONS_PORT`: bind address (default 127.0.0.1:8090)
//! - `COLLECTIONS_DEV_TOKEN`: when set, grants that bearer token every scope
//!   for a fresh development user
//! - `RUST_LOG`: log filter (default `info`)

use anyhow::Context;
use collections_api::auth::{scopes, TokenRegistry};
use collections_api::{ApiConfig, ApiService, AppState};
use collections_core::adapters::{
    ContributorGate, InMemoryCollectionStore, InMemoryLinkStore, InMemoryNodeStore,
    SystemTimeSource,
};
use collections_core::{CollectionService, ServiceDependencies};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn config_from_env() -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::default();
    if let Ok(host) = std::env::var("COLLECTIONS_HOST") {
        config.host = host.parse().context("invalid COLLECTIONS_HOST")?;
    }
    if let Ok(port) = std::env::var("COLLECTIONS_PORT") {
        config.port = port.parse().context("invalid COLLECTIONS_PORT")?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config_from_env()?;

    let service = CollectionService::new(ServiceDependencies {
        collections: InMemoryCollectionStore::new(),
        nodes: InMemoryNodeStore::new(),
        links: InMemoryLinkStore::new(),
        gate: ContributorGate::new(),
        time: SystemTimeSource,
    });

    let mut tokens = TokenRegistry::new();
    if let Ok(token) = std::env::var("COLLECTIONS_DEV_TOKEN") {
        let user = uuid::Uuid::new_v4();
        tokens.grant(token, user, scopes::ALL);
        info!(%user, "development token registered");
    }

    let state = AppState::new(service, tokens, config.clone());
    let api = ApiService::new(config)?;
    api.serve(state).await?;
    Ok(())
}
