//! Error types for the whitelist service

use common::WhitelistError;
use serde::Serialize;
use thiserror::Error;

/// Main error type for whitelist operations
#[derive(Debug, Error)]
pub enum Error {
    /// Candidate name failed the syntax check; no network call was made
    #[error("Invalid name: {message}")]
    Validation { message: String },

    /// Identity service returned no candidate for the name
    #[error("Identity not found: {name}")]
    NotFound { name: String },

    /// Identity service returned a candidate whose name differs from the request
    #[error("Identity mismatch: requested {requested}, service returned {returned}")]
    Mismatch { requested: String, returned: String },

    /// Upstream answered HTTP 429
    #[error("Rate limited by {service}")]
    RateLimited { service: String },

    /// Upstream answered HTTP 5xx
    #[error("{service} is unavailable (HTTP {status})")]
    UpstreamUnavailable { service: String, status: u16 },

    /// Upstream call exceeded its deadline
    #[error("Request to {service} timed out")]
    Timeout { service: String },

    /// Upstream answered some other non-2xx status or an unreadable body
    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    /// Document fetch or replace failed
    #[error("Document store error: {message}")]
    Store { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] common::ConfigurationError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Mutation worker stopped or the task was aborted before reporting
    #[error("Mutation queue closed: {message}")]
    QueueClosed { message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl WhitelistError for Error {}

/// Failure category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Mismatch,
    RateLimited,
    UpstreamUnavailable,
    Timeout,
    Upstream,
    Store,
    Internal,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Error::Store {
            message: message.into(),
        }
    }

    /// Get the failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Mismatch { .. } => ErrorKind::Mismatch,
            Error::RateLimited { .. } => ErrorKind::RateLimited,
            Error::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Upstream { .. } => ErrorKind::Upstream,
            Error::Store { .. } => ErrorKind::Store,
            Error::Config(_) | Error::HttpClient(_) | Error::QueueClosed { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Get error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "WHITELIST_VALIDATION_ERROR",
            Error::NotFound { .. } => "WHITELIST_NOT_FOUND",
            Error::Mismatch { .. } => "WHITELIST_MISMATCH",
            Error::RateLimited { .. } => "WHITELIST_RATE_LIMIT",
            Error::UpstreamUnavailable { .. } => "WHITELIST_UPSTREAM_UNAVAILABLE",
            Error::Timeout { .. } => "WHITELIST_TIMEOUT",
            Error::Upstream { .. } => "WHITELIST_UPSTREAM_ERROR",
            Error::Store { .. } => "WHITELIST_STORE_ERROR",
            Error::Config(_) => "WHITELIST_CONFIG_ERROR",
            Error::HttpClient(_) => "WHITELIST_HTTP_CLIENT_ERROR",
            Error::QueueClosed { .. } => "WHITELIST_QUEUE_CLOSED",
        }
    }

    /// Whether the identity could not be resolved at all
    pub fn is_unresolved_identity(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Mismatch { .. })
    }

    /// Check if a later attempt might succeed
    ///
    /// Nothing in this crate retries; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RateLimited { .. }
                | Error::UpstreamUnavailable { .. }
                | Error::Timeout { .. }
                | Error::Store { .. }
        )
    }

    /// Check if error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::NotFound { .. } | Error::Mismatch { .. }
        )
    }
}
