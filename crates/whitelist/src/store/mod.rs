//! Access to the shared remote whitelist document
//!
//! The store only offers whole-document fetch and replace. Callers that
//! modify the document must go through the mutation queue.

mod http;
mod memory;

pub use http::PasteDocumentStore;
pub use memory::MemoryDocumentStore;

use crate::{config::Visibility, error::Result};
use async_trait::async_trait;

/// Whole-document get/put against one fixed document
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current content verbatim; empty when the store reports none
    async fn fetch(&self) -> Result<String>;

    /// Overwrite the full content
    async fn replace(&self, content: &str, title: &str, visibility: Visibility) -> Result<()>;
}
