//! In-process document store

use super::DocumentStore;
use crate::{config::Visibility, error::Result};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};

/// Document kept in memory, for local runs and tests
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    content: Mutex<String>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(content.into()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the stored content
    pub fn content(&self) -> String {
        self.content
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of replace calls served
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch(&self) -> Result<String> {
        Ok(self.content())
    }

    async fn replace(&self, content: &str, _title: &str, _visibility: Visibility) -> Result<()> {
        *self
            .content
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = content.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_overwrites_and_counts() {
        let store = MemoryDocumentStore::new("Alice");
        assert_eq!(store.fetch().await.unwrap(), "Alice");

        store
            .replace("Alice\nBob", "whitelist", Visibility::Unlisted)
            .await
            .unwrap();

        assert_eq!(store.fetch().await.unwrap(), "Alice\nBob");
        assert_eq!(store.write_count(), 1);
    }
}
