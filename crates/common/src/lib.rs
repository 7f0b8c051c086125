//! # Common
//!
//! Shared infrastructure for the whitelist workspace.
//!
//! ## Key Features
//! - `WhitelistError` marker trait and configuration error types
//! - Layered configuration loading (defaults, TOML file, environment)
//! - Logging initialisation for console, JSON and journald output

pub mod config;
pub mod error;
pub mod journal;

pub use config::*;
pub use error::*;

/// Version of the common crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
