//! Server configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Main API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the HTTP server
    pub host: IpAddr,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Default page size for list endpoints
    pub page_size: usize,
    /// Hard cap a client may request via `page[size]`
    pub max_page_size: usize,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Allow cross-origin requests
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8090,
            page_size: 10,
            max_page_size: 100,
            request_timeout_secs: 30,
            cors_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(
                "page_size cannot be 0".into(),
            ));
        }
        if self.max_page_size < self.page_size {
            return Err(ConfigError::InvalidPageSize(format!(
                "max_page_size {} is below page_size {}",
                self.max_page_size, self.page_size
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// The socket address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid page size: {0}")]
    InvalidPageSize(String),

    #[error("request timeout cannot be 0")]
    InvalidTimeout,
}
