//! Shared HTTP client plumbing for the upstream services

use crate::error::{Error, Result};
use reqwest::StatusCode;
use std::time::Duration;

/// Build a client whose every request, body included, is bounded by `timeout`
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("whitelist/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::HttpClient)
}

/// Map a non-success status from a lookup-style upstream
pub(crate) fn status_error(service: &str, status: StatusCode) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Error::RateLimited {
            service: service.to_string(),
        }
    } else if status.as_u16() >= 500 {
        Error::UpstreamUnavailable {
            service: service.to_string(),
            status: status.as_u16(),
        }
    } else {
        Error::Upstream {
            service: service.to_string(),
            message: format!("unexpected HTTP {status}"),
        }
    }
}

/// Map a transport failure from a lookup-style upstream
pub(crate) fn transport_error(service: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            service: service.to_string(),
        }
    } else if let Some(status) = err.status() {
        status_error(service, status)
    } else {
        Error::Upstream {
            service: service.to_string(),
            message: err.to_string(),
        }
    }
}
