//! Identity verification against the external identity service
//!
//! A candidate name is checked locally for syntax, then looked up through an
//! [`IdentityLookup`]. The first candidate returned must match the requested
//! name case-insensitively; its spelling becomes the canonical name.

mod http;

pub use http::HttpIdentityLookup;

use crate::{
    error::{Error, Result},
    journal, metrics,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Minimum accepted name length
pub const MIN_NAME_LEN: usize = 3;

/// Maximum accepted name length
pub const MAX_NAME_LEN: usize = 20;

/// Opaque user id; the service may report it as a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(u64),
    Str(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Int(id) => write!(f, "{id}"),
            ExternalId::Str(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ExternalId {
    fn from(id: u64) -> Self {
        ExternalId::Int(id)
    }
}

impl From<&str> for ExternalId {
    fn from(id: &str) -> Self {
        ExternalId::Str(id.to_string())
    }
}

/// A resolved identity, as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// External user id
    pub id: ExternalId,

    /// Canonical spelling of the name
    pub name: String,

    /// Display name, when the service reports one
    pub display_name: Option<String>,
}

impl Identity {
    /// Display name, falling back to the canonical name
    pub fn display_name_or_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// One candidate record from a lookup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub id: ExternalId,
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl From<Candidate> for Identity {
    fn from(candidate: Candidate) -> Self {
        let display_name = candidate.display_name.filter(|d| !d.is_empty());
        Self {
            id: candidate.id,
            name: candidate.name,
            display_name,
        }
    }
}

/// Transport to the identity service
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Fetch candidate records for exactly `name`
    async fn lookup(&self, name: &str) -> Result<Vec<Candidate>>;
}

/// Check a raw name and return it trimmed
pub fn validate_name(raw_name: &str) -> Result<&str> {
    let name = raw_name.trim();

    if name.is_empty() {
        return Err(Error::validation("name is empty"));
    }

    let len = name.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(Error::validation(format!(
            "name must be {MIN_NAME_LEN}-{MAX_NAME_LEN} characters, got {len}"
        )));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(Error::validation(format!(
            "name may only contain letters, digits and underscores, found {bad:?}"
        )));
    }

    Ok(name)
}

/// Pick the identity for `requested` out of the lookup result
fn resolve(requested: &str, candidates: Vec<Candidate>) -> Result<Identity> {
    let Some(candidate) = candidates.into_iter().next() else {
        return Err(Error::NotFound {
            name: requested.to_string(),
        });
    };

    if candidate.name.to_lowercase() != requested.to_lowercase() {
        return Err(Error::Mismatch {
            requested: requested.to_string(),
            returned: candidate.name,
        });
    }

    Ok(candidate.into())
}

/// Validates and resolves candidate names
///
/// Holds no state besides the lookup transport, so concurrent calls are safe
/// and every call goes to the service.
#[derive(Clone)]
pub struct IdentityVerifier {
    lookup: Arc<dyn IdentityLookup>,
}

impl IdentityVerifier {
    pub fn new(lookup: Arc<dyn IdentityLookup>) -> Self {
        Self { lookup }
    }

    /// Validate `raw_name` and resolve it to a canonical identity
    pub async fn verify(&self, raw_name: &str) -> Result<Identity> {
        let name = match validate_name(raw_name) {
            Ok(name) => name,
            Err(e) => {
                metrics::record_verification("invalid");
                journal::log_verification_failed(raw_name, &e);
                return Err(e);
            }
        };

        let result = self
            .lookup
            .lookup(name)
            .await
            .and_then(|candidates| resolve(name, candidates));

        match &result {
            Ok(identity) => {
                metrics::record_verification("resolved");
                journal::log_verification_succeeded(name, identity);
            }
            Err(e) => {
                metrics::record_verification(if e.is_unresolved_identity() {
                    "unresolved"
                } else {
                    "error"
                });
                journal::log_verification_failed(name, e);
            }
        }

        result
    }
}
