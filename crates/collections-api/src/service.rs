//! API service - server bootstrap and middleware stack.

use crate::config::{ApiConfig, ConfigError};
use crate::routes::{build_router, AppState};
use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server startup errors
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(std::io::Error),

    /// Server runtime error
    #[error("server error: {0}")]
    Server(std::io::Error),
}

/// The HTTP service wrapping the collections router.
pub struct ApiService {
    config: ApiConfig,
}

impl ApiService {
    /// Create a new API service with a validated configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The route table with the middleware stack applied.
    pub fn router(&self, state: AppState) -> Router {
        let mut router = build_router(state).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    self.config.request_timeout_secs,
                ))),
        );

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// Bind and serve until shutdown.
    pub async fn serve(&self, state: AppState) -> Result<(), ServeError> {
        let addr = self.config.bind_addr();
        let router = self.router(state);

        info!(%addr, "starting collections API server");
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServeError::Bind)?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutdown signal received");
            })
            .await
            .map_err(ServeError::Server)
    }
}
