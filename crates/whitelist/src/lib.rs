//! # Whitelist
//!
//! Membership whitelist kept in one shared remote text document. New entries
//! are admitted only after the identity service confirms the name and
//! supplies its canonical spelling.
//!
//! ## Components
//!
//! - **Identity verification**: syntax check, then lookup against the identity service
//! - **Document store**: whole-document fetch and replace of the remote whitelist
//! - **Mutation queue**: one get-modify-put cycle in flight at a time, FIFO
//! - **Registrar**: verification, serialized merge, and read-only queries
//!
//! The mutation queue serializes writers within one process only. Running
//! two writer processes against the same document can lose updates.

pub mod config;
pub mod document;
pub mod error;
mod http;
pub mod identity;
pub mod journal;
pub mod metrics;
pub mod queue;
pub mod registrar;
pub mod store;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use identity::{Identity, IdentityVerifier};
pub use queue::MutationQueue;
pub use registrar::{Registration, WhitelistRegistrar, WhitelistStats};

/// Version of the whitelist crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
