//! # Collections API
//!
//! HTTP surface for the collections service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      COLLECTIONS API                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  axum Router                                                 │
//! │    /v1/collections/                 list, create, bulk ops   │
//! │    /v1/collections/{id}/            detail                   │
//! │    /v1/collections/{id}/linked_nodes/          scoped view   │
//! │    /v1/collections/{id}/linked_registrations/  scoped view   │
//! │    /v1/collections/{id}/relationships/...      reconciler    │
//! │    /v1/collections/{id}/node_links/...         legacy edges  │
//! │         │                                                    │
//! │  Middleware: Trace → CORS → Timeout                          │
//! │         │                                                    │
//! │  AuthContext (bearer token → principal + scopes)             │
//! │         │                                                    │
//! │  collections-core service behind one RwLock                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler resolves an [`auth::AuthContext`] from the request headers,
//! checks the per-endpoint scope configuration, then drives the core service
//! through its inbound ports. Responses and errors are JSON:API documents.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod routes;
pub mod service;

pub use auth::{AuthContext, ScopeConfig, TokenRegistry};
pub use config::{ApiConfig, ConfigError};
pub use error::ApiFailure;
pub use routes::{build_router, AppState, SharedService};
pub use service::ApiService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
