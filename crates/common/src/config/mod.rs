//! # Configuration Abstractions
//!
//! Layered configuration loading shared by every component.

pub mod loader;
pub mod traits;

pub use loader::*;
pub use traits::*;
