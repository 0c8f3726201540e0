//! HTTP interaction layer for the ChatBI client.
//!
//! Implements the core capability traits against the ChatBI REST API.

pub mod config;
pub mod http_backend;

pub use config::BackendConfig;
pub use http_backend::HttpBackend;
