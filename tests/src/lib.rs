//! # Collections Service Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── service_flows.rs   # End-to-end flows through the inbound ports
//!     └── http_api.rs        # JSON:API surface driven through the router
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p collections-tests
//!
//! # By category
//! cargo test -p collections-tests integration::service_flows
//! cargo test -p collections-tests integration::http_api
//! ```

#![allow(dead_code)]

pub mod integration;
