//! Registration pipeline and read-only whitelist queries
//!
//! `register` verifies outside the mutation queue, then runs the
//! fetch-merge-persist cycle inside it. `stats` and `check_membership` read
//! the document directly and may observe a state older or newer than an
//! in-flight registration.

use crate::{
    config::{Config, Visibility},
    document::{entry_key, WhitelistDocument},
    error::Result,
    identity::{HttpIdentityLookup, Identity, IdentityVerifier},
    journal, metrics,
    queue::MutationQueue,
    store::{DocumentStore, PasteDocumentStore},
};
use futures::future::join_all;
use serde::Serialize;
use std::{sync::Arc, time::Instant};
use tracing::{debug, info};

/// Outcome of a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Whether the name was appended by this call
    pub is_new: bool,

    /// Entry count after the merge
    pub total_count: usize,

    /// Name as stored, in the identity service's spelling
    pub canonical_name: String,

    pub identity: Identity,
}

/// Point-in-time snapshot of the whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhitelistStats {
    pub count: usize,
    pub usernames: Vec<String>,
}

impl WhitelistStats {
    fn from_document(document: WhitelistDocument) -> Self {
        Self {
            count: document.len(),
            usernames: document.into_entries(),
        }
    }

    /// The `n` most recently added entries, oldest first
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.usernames.len().saturating_sub(n);
        &self.usernames[start..]
    }

    /// Entries in pages of `size` (at least one per page)
    pub fn pages(&self, size: usize) -> std::slice::Chunks<'_, String> {
        self.usernames.chunks(size.max(1))
    }

    /// Case-insensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        let key = entry_key(name);
        self.usernames.iter().any(|u| entry_key(u) == key)
    }
}

/// Where persisted content is labelled on replace
#[derive(Debug, Clone)]
pub struct PersistOptions {
    pub title: String,
    pub visibility: Visibility,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            title: "whitelist".to_string(),
            visibility: Visibility::Unlisted,
        }
    }
}

struct MergeOutcome {
    is_new: bool,
    total_count: usize,
}

/// Verifies names and merges them into the shared document
#[derive(Clone)]
pub struct WhitelistRegistrar {
    verifier: IdentityVerifier,
    store: Arc<dyn DocumentStore>,
    queue: MutationQueue,
    persist: Arc<PersistOptions>,
}

impl WhitelistRegistrar {
    pub fn new(
        verifier: IdentityVerifier,
        store: Arc<dyn DocumentStore>,
        queue: MutationQueue,
        persist: PersistOptions,
    ) -> Self {
        Self {
            verifier,
            store,
            queue,
            persist: Arc::new(persist),
        }
    }

    /// Wire the HTTP lookup, the paste store and a fresh mutation queue
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let lookup = HttpIdentityLookup::new(&config.identity)?;
        let store = PasteDocumentStore::new(&config.store)?;

        info!(
            document_id = %config.store.document_id,
            identity_endpoint = %config.identity.endpoint,
            "Whitelist registrar initialized"
        );

        Ok(Self::new(
            IdentityVerifier::new(Arc::new(lookup)),
            Arc::new(store),
            MutationQueue::spawn(),
            PersistOptions {
                title: config.store.title.clone(),
                visibility: config.store.visibility,
            },
        ))
    }

    /// Verify `raw_name` and add its canonical form to the whitelist
    ///
    /// A duplicate (by lowercase key) performs no write and reports
    /// `is_new = false`. Verification failures are returned unchanged; a
    /// store failure leaves the document as it was.
    pub async fn register(&self, raw_name: &str) -> Result<Registration> {
        let identity = match self.verifier.verify(raw_name).await {
            Ok(identity) => identity,
            Err(e) => {
                metrics::record_registration("failed");
                return Err(e);
            }
        };
        let canonical = identity.name.clone();

        let merge = merge_entry(self.store.clone(), self.persist.clone(), canonical.clone());
        match self.queue.submit(merge).await {
            Ok(outcome) => {
                metrics::record_registration(if outcome.is_new { "new" } else { "duplicate" });
                journal::log_registration_completed(&canonical, outcome.is_new, outcome.total_count);
                Ok(Registration {
                    is_new: outcome.is_new,
                    total_count: outcome.total_count,
                    canonical_name: canonical,
                    identity,
                })
            }
            Err(e) => {
                metrics::record_registration("failed");
                journal::log_registration_failed(&canonical, &e);
                Err(e)
            }
        }
    }

    /// Register several names concurrently; results follow input order
    pub async fn register_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<Result<Registration>> {
        join_all(names.iter().map(|name| self.register(name.as_ref()))).await
    }

    /// Read the current whitelist without going through the mutation queue
    pub async fn stats(&self) -> Result<WhitelistStats> {
        let content = self.store.fetch().await?;
        let stats = WhitelistStats::from_document(WhitelistDocument::parse(&content));
        debug!(count = stats.count, "Whitelist snapshot read");
        Ok(stats)
    }

    /// Whether `raw_name` is on the whitelist, case-insensitively
    ///
    /// No identity verification is performed. The document is always read,
    /// so a store failure surfaces even for an empty name.
    pub async fn check_membership(&self, raw_name: &str) -> Result<bool> {
        let stats = self.stats().await?;
        let name = raw_name.trim();
        Ok(!name.is_empty() && stats.contains(name))
    }
}

/// One fetch-dedupe-conditional-persist cycle; runs inside the mutation queue
async fn merge_entry(
    store: Arc<dyn DocumentStore>,
    persist: Arc<PersistOptions>,
    canonical: String,
) -> Result<MergeOutcome> {
    let started = Instant::now();

    let content = store.fetch().await?;
    let mut document = WhitelistDocument::parse(&content);
    let is_new = document.insert(&canonical);

    if is_new {
        let content = document.to_content();
        store
            .replace(&content, &persist.title, persist.visibility)
            .await?;
        metrics::record_document_write();
        journal::log_document_persisted(document.len(), content.len());
    } else {
        debug!(canonical = %canonical, "Already whitelisted, skipping write");
    }

    metrics::record_merge_duration(started.elapsed());

    Ok(MergeOutcome {
        is_new,
        total_count: document.len(),
    })
}
