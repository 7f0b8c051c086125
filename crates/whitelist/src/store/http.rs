//! Paste-service backed document store

use super::DocumentStore;
use crate::{
    config::{StoreConfig, Visibility},
    error::{Error, Result},
    http::build_client,
};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "document store";

#[derive(Serialize)]
struct ReplaceBody<'a> {
    title: &'a str,
    content: &'a str,
    encrypted: bool,
    visibility: Visibility,
    tags: [&'a str; 0],
}

/// Document stored as a paste at `{base_url}/paste/{document_id}`
pub struct PasteDocumentStore {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl PasteDocumentStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            url: format!(
                "{}/paste/{}",
                config.base_url.trim_end_matches('/'),
                config.document_id
            ),
            api_key: config.api_key.clone(),
        })
    }

    fn request_error(&self, op: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                service: SERVICE.to_string(),
            }
        } else {
            Error::store(format!("{op} {} failed: {err}", self.url))
        }
    }

    fn status_error(&self, op: &str, status: reqwest::StatusCode) -> Error {
        Error::store(format!("{op} {} returned HTTP {status}", self.url))
    }
}

#[async_trait]
impl DocumentStore for PasteDocumentStore {
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| self.request_error("GET", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error("GET", status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| self.request_error("GET", e))?;

        let content = body
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        debug!(bytes = content.len(), "Fetched whitelist document");
        Ok(content)
    }

    async fn replace(&self, content: &str, title: &str, visibility: Visibility) -> Result<()> {
        let response = self
            .client
            .put(&self.url)
            .bearer_auth(&self.api_key)
            .json(&ReplaceBody {
                title,
                content,
                encrypted: false,
                visibility,
                tags: [],
            })
            .send()
            .await
            .map_err(|e| self.request_error("PUT", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status_error("PUT", status));
        }

        debug!(
            bytes = content.len(),
            title = %title,
            visibility = %visibility,
            "Replaced whitelist document"
        );
        Ok(())
    }
}
