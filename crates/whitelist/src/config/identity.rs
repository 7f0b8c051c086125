//! Identity service configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Username lookup endpoint (POST)
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Ask the service to omit banned accounts from the candidates
    pub exclude_banned_users: bool,
}

impl IdentityConfig {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://users.roblox.com/v1/usernames/users".to_string(),
            timeout_secs: 10,
            exclude_banned_users: false,
        }
    }
}
