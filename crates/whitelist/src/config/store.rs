//! Document store configuration

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

/// Visibility sent along with every document replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    #[default]
    Unlisted,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "PUBLIC"),
            Visibility::Unlisted => write!(f, "UNLISTED"),
            Visibility::Private => write!(f, "PRIVATE"),
        }
    }
}

/// Remote document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// API base URL; documents live under `{base_url}/paste/{id}`
    pub base_url: String,

    /// Bearer token for the store API
    pub api_key: String,

    /// Identifier of the shared whitelist document
    pub document_id: String,

    /// Title written on every replace
    pub title: String,

    /// Visibility written on every replace
    pub visibility: Visibility,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pastefy.app/api/v2".to_string(),
            api_key: String::new(),
            document_id: String::new(),
            title: "whitelist".to_string(),
            visibility: Visibility::Unlisted,
            timeout_secs: 10,
        }
    }
}
