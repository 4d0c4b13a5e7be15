//! Shared library for the anime catalog browser.
//!
//! This crate provides common functionality used by the client library and
//! the browser binary:
//! - Configuration management
//! - Logging infrastructure
//! - Display models produced from Jikan API payloads

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
