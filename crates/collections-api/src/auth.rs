//! Bearer-token authentication and per-endpoint scope checks.
//!
//! Tokens resolve to a user plus a set of granted scopes. Scope requirements
//! are not ambient state: each endpoint group receives its own
//! [`ScopeConfig`] at route-registration time.

use crate::error::ApiFailure;
use axum::http::{header, HeaderMap};
use collections_core::{CollectionError, Principal, UserId};
use std::collections::{HashMap, HashSet};

/// OAuth-style scope names.
pub mod scopes {
    pub const COLLECTIONS_READ: &str = "collections.read";
    pub const COLLECTIONS_WRITE: &str = "collections.write";
    pub const NODE_LINKS_READ: &str = "node_links.read";
    pub const NODE_LINKS_WRITE: &str = "node_links.write";

    /// Every scope, for convenience when seeding tokens.
    pub const ALL: &[&str] = &[
        COLLECTIONS_READ,
        COLLECTIONS_WRITE,
        NODE_LINKS_READ,
        NODE_LINKS_WRITE,
    ];
}

/// Scope requirements for one endpoint group, supplied at route registration.
#[derive(Debug, Clone, Copy)]
pub struct ScopeConfig {
    pub read_scopes: &'static [&'static str],
    pub write_scopes: &'static [&'static str],
}

/// A granted access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub user: UserId,
    pub scopes: HashSet<String>,
}

/// Token table: opaque bearer string to grant.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, AccessToken>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as belonging to `user` with the given scopes.
    pub fn grant(&mut self, token: impl Into<String>, user: UserId, scopes: &[&str]) {
        self.tokens.insert(
            token.into(),
            AccessToken {
                user,
                scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
            },
        );
    }

    fn resolve(&self, token: &str) -> Option<&AccessToken> {
        self.tokens.get(token)
    }
}

/// The authenticated request context: who is calling, with which scopes.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    scopes: HashSet<String>,
}

impl AuthContext {
    /// Resolve the context from request headers.
    ///
    /// No `Authorization` header means an anonymous principal; a bearer
    /// token that the registry does not know is an authentication failure.
    pub fn from_headers(headers: &HeaderMap, registry: &TokenRegistry) -> Result<Self, ApiFailure> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(Self {
                principal: Principal::Anonymous,
                scopes: HashSet::new(),
            });
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ApiFailure::from(CollectionError::invalid("malformed Authorization header"))
            })?;

        let grant = registry
            .resolve(token)
            .ok_or(ApiFailure::from(CollectionError::Unauthenticated))?;

        Ok(Self {
            principal: Principal::User(grant.user),
            scopes: grant.scopes.clone(),
        })
    }

    /// Check the read scopes of `config`.
    ///
    /// Anonymous requests carry no token and therefore no scope grant;
    /// object-level visibility is the service's decision.
    pub fn require_read(&self, config: &ScopeConfig) -> Result<(), ApiFailure> {
        self.require(config.read_scopes)
    }

    /// Check the write scopes of `config`.
    pub fn require_write(&self, config: &ScopeConfig) -> Result<(), ApiFailure> {
        self.require(config.write_scopes)
    }

    fn require(&self, required: &[&str]) -> Result<(), ApiFailure> {
        if self.principal.is_anonymous() {
            return Ok(());
        }
        for scope in required {
            if !self.scopes.contains(*scope) {
                return Err(ApiFailure::from(CollectionError::forbidden(format!(
                    "token lacks required scope {scope}"
                ))));
            }
        }
        Ok(())
    }
}
