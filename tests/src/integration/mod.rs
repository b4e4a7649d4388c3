//! Cross-crate integration tests.

pub mod http_api;
pub mod service_flows;
