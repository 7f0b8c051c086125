//! HTTP transport for the username lookup endpoint

use super::{Candidate, IdentityLookup};
use crate::{
    config::IdentityConfig,
    error::{Error, Result},
    http::{build_client, status_error, transport_error},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SERVICE: &str = "identity service";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    usernames: [&'a str; 1],
    exclude_banned_users: bool,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Option<Vec<Candidate>>,
}

/// Looks names up with `POST {endpoint}` and a `{"usernames": [..]}` body
pub struct HttpIdentityLookup {
    client: reqwest::Client,
    endpoint: String,
    exclude_banned_users: bool,
}

impl HttpIdentityLookup {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            endpoint: config.endpoint.clone(),
            exclude_banned_users: config.exclude_banned_users,
        })
    }
}

#[async_trait]
impl IdentityLookup for HttpIdentityLookup {
    async fn lookup(&self, name: &str) -> Result<Vec<Candidate>> {
        debug!(name = %name, endpoint = %self.endpoint, "Looking up identity");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest {
                usernames: [name],
                exclude_banned_users: self.exclude_banned_users,
            })
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(SERVICE, status));
        }

        let body: LookupResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(SERVICE, &e)
            } else {
                Error::Upstream {
                    service: SERVICE.to_string(),
                    message: format!("invalid response body: {e}"),
                }
            }
        })?;

        let candidates = body.data.unwrap_or_default();
        debug!(name = %name, candidates = candidates.len(), "Identity lookup returned");
        Ok(candidates)
    }
}
