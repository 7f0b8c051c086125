//! Logging initialisation using tracing
//!
//! Console output for development, JSON for log shippers, and systemd's
//! journal when the process runs under it.

pub mod init;

pub use init::init_logging;
