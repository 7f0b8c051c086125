//! Registration pipeline behaviour against in-process fakes

use async_trait::async_trait;
use mockall::{mock, predicate::eq};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use whitelist::{
    config::Visibility,
    identity::{Candidate, ExternalId, IdentityLookup},
    registrar::PersistOptions,
    store::{DocumentStore, MemoryDocumentStore},
    Error, ErrorKind, IdentityVerifier, MutationQueue, Result, WhitelistRegistrar,
};

/// Identity service backed by a fixed directory of canonical names
struct DirectoryLookup {
    users: HashMap<String, Candidate>,
    calls: AtomicUsize,
}

impl DirectoryLookup {
    fn new(users: &[(u64, &str)]) -> Arc<Self> {
        let users = users
            .iter()
            .map(|(id, name)| {
                (
                    name.to_lowercase(),
                    Candidate {
                        id: (*id).into(),
                        name: name.to_string(),
                        display_name: Some(format!("{name} (display)")),
                    },
                )
            })
            .collect();

        Arc::new(Self {
            users,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for DirectoryLookup {
    async fn lookup(&self, name: &str) -> Result<Vec<Candidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .get(&name.to_lowercase())
            .cloned()
            .into_iter()
            .collect())
    }
}

mock! {
    Lookup {}

    #[async_trait]
    impl IdentityLookup for Lookup {
        async fn lookup(&self, name: &str) -> Result<Vec<Candidate>>;
    }
}

/// Memory store that sleeps between operations and can fail on demand
struct FlakyStore {
    inner: MemoryDocumentStore,
    delay: Duration,
    fail_replace: AtomicBool,
    fail_fetch: AtomicBool,
}

impl FlakyStore {
    fn new(content: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryDocumentStore::new(content),
            delay,
            fail_replace: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn fetch(&self) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Error::store("GET returned HTTP 503"));
        }
        self.inner.fetch().await
    }

    async fn replace(&self, content: &str, title: &str, visibility: Visibility) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(Error::store("PUT returned HTTP 500"));
        }
        self.inner.replace(content, title, visibility).await
    }
}

fn registrar_with(lookup: Arc<DirectoryLookup>, store: Arc<FlakyStore>) -> WhitelistRegistrar {
    WhitelistRegistrar::new(
        IdentityVerifier::new(lookup),
        store,
        MutationQueue::spawn(),
        PersistOptions::default(),
    )
}

#[tokio::test]
async fn test_example_walkthrough() {
    let lookup = DirectoryLookup::new(&[(42, "Alice")]);
    let store = FlakyStore::new("", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    let first = registrar.register("Alice").await.unwrap();
    assert!(first.is_new);
    assert_eq!(first.total_count, 1);
    assert_eq!(first.identity.id, ExternalId::Int(42));
    assert_eq!(store.inner.content(), "Alice");

    let second = registrar.register("alice").await.unwrap();
    assert!(!second.is_new);
    assert_eq!(second.total_count, 1);
    assert_eq!(second.canonical_name, "Alice");

    let err = registrar.register("bad name").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.inner.content(), "Alice");
}

#[tokio::test]
async fn test_registering_twice_is_idempotent() {
    let lookup = DirectoryLookup::new(&[(1, "Builder_Bob")]);
    let store = FlakyStore::new("Alice", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    let first = registrar.register("builder_bob").await.unwrap();
    let second = registrar.register("builder_bob").await.unwrap();

    assert!(first.is_new);
    assert!(!second.is_new);
    assert_eq!(first.total_count, 2);
    assert_eq!(second.total_count, first.total_count);
    assert_eq!(store.inner.write_count(), 1);
}

#[tokio::test]
async fn test_case_variants_never_duplicate() {
    let lookup = DirectoryLookup::new(&[(5, "Foo")]);
    let store = FlakyStore::new("", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    registrar.register("Foo").await.unwrap();
    registrar.register("foo").await.unwrap();
    registrar.register("FOO").await.unwrap();

    let stats = registrar.stats().await.unwrap();
    assert_eq!(stats.usernames, ["Foo"]);
}

#[tokio::test]
async fn test_existing_casing_is_preserved() {
    let lookup = DirectoryLookup::new(&[(5, "Foo")]);
    let store = FlakyStore::new("fOO", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    let registration = registrar.register("foo").await.unwrap();
    assert!(!registration.is_new);
    assert_eq!(store.inner.content(), "fOO");
    assert_eq!(store.inner.write_count(), 0);
}

#[tokio::test]
async fn test_order_follows_registration_order() {
    let names = ["Zed", "Amy", "Mia", "Bob_1"];
    let users: Vec<(u64, &str)> = names.iter().enumerate().map(|(i, n)| (i as u64, *n)).collect();
    let lookup = DirectoryLookup::new(&users);
    let store = FlakyStore::new("", Duration::ZERO);
    let registrar = registrar_with(lookup, store);

    for name in names {
        registrar.register(&name.to_lowercase()).await.unwrap();
    }

    let stats = registrar.stats().await.unwrap();
    assert_eq!(stats.usernames, names);
    assert_eq!(stats.count, names.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_lose_nothing() {
    let names: Vec<String> = (0..24).map(|i| format!("Player_{i:02}")).collect();
    let users: Vec<(u64, &str)> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (i as u64, n.as_str()))
        .collect();
    let lookup = DirectoryLookup::new(&users);
    // The delay widens the window between fetch and replace.
    let store = FlakyStore::new("", Duration::from_millis(3));
    let registrar = registrar_with(lookup, store.clone());

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let registrar = registrar.clone();
            let name = name.clone();
            tokio::spawn(async move { registrar.register(&name).await })
        })
        .collect();

    let mut counts = Vec::new();
    for handle in handles {
        let registration = handle.await.unwrap().unwrap();
        assert!(registration.is_new);
        counts.push(registration.total_count);
    }

    counts.sort_unstable();
    assert_eq!(counts, (1..=names.len()).collect::<Vec<_>>());

    let stats = registrar.stats().await.unwrap();
    assert_eq!(stats.count, names.len());
    let mut stored = stats.usernames.clone();
    stored.sort();
    assert_eq!(stored, names);
    assert_eq!(store.inner.write_count(), names.len());
}

#[tokio::test]
async fn test_register_many_keeps_input_order() {
    let lookup = DirectoryLookup::new(&[(1, "Alice"), (2, "Bob")]);
    let store = FlakyStore::new("", Duration::from_millis(1));
    let registrar = registrar_with(lookup, store);

    let results = registrar
        .register_many(&["alice", "ghost", "bob", "ALICE"])
        .await;

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().canonical_name, "Alice");
    assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(results[2].as_ref().unwrap().canonical_name, "Bob");
    assert_eq!(results[3].as_ref().unwrap().canonical_name, "Alice");

    let new_alices = [0, 3]
        .into_iter()
        .filter(|&i| results[i].as_ref().unwrap().is_new)
        .count();
    assert_eq!(new_alices, 1);
    assert_eq!(registrar.stats().await.unwrap().count, 2);
}

#[tokio::test]
async fn test_invalid_names_make_no_lookup() {
    let lookup = DirectoryLookup::new(&[(1, "Alice")]);
    let store = FlakyStore::new("", Duration::ZERO);
    let registrar = registrar_with(lookup.clone(), store.clone());

    let too_long = "a".repeat(21);
    for bad in ["ab", too_long.as_str(), "has space", "dash-name", "bang!", ""] {
        let err = registrar.register(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{bad:?}");
    }

    assert_eq!(lookup.calls(), 0);
    assert_eq!(store.inner.write_count(), 0);
}

#[tokio::test]
async fn test_unknown_identity_is_reported() {
    let lookup = DirectoryLookup::new(&[(1, "Alice")]);
    let store = FlakyStore::new("", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    let err = registrar.register("nobody").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.is_unresolved_identity());
    assert_eq!(store.inner.write_count(), 0);
}

#[tokio::test]
async fn test_store_failure_is_isolated() {
    let lookup = DirectoryLookup::new(&[(1, "Alice"), (2, "Bob")]);
    let store = FlakyStore::new("Carol", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    store.fail_replace.store(true, Ordering::SeqCst);
    let err = registrar.register("alice").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(store.inner.content(), "Carol");

    store.fail_replace.store(false, Ordering::SeqCst);
    let registration = registrar.register("bob").await.unwrap();
    assert!(registration.is_new);
    assert_eq!(registration.total_count, 2);
    assert_eq!(store.inner.content(), "Carol\nBob");
}

#[tokio::test]
async fn test_fetch_failure_propagates_from_queries() {
    let lookup = DirectoryLookup::new(&[(1, "Alice")]);
    let store = FlakyStore::new("Alice", Duration::ZERO);
    let registrar = registrar_with(lookup, store.clone());

    store.fail_fetch.store(true, Ordering::SeqCst);
    assert_eq!(
        registrar.register("alice").await.unwrap_err().kind(),
        ErrorKind::Store
    );
    assert_eq!(registrar.stats().await.unwrap_err().kind(), ErrorKind::Store);
    for name in ["alice", "", "   "] {
        assert_eq!(
            registrar.check_membership(name).await.unwrap_err().kind(),
            ErrorKind::Store,
            "membership of {name:?}"
        );
    }
}

#[tokio::test]
async fn test_membership_ignores_identity_service() {
    let lookup = DirectoryLookup::new(&[]);
    let store = FlakyStore::new("Legacy_User\nalice", Duration::ZERO);
    let registrar = registrar_with(lookup.clone(), store);

    assert!(registrar.check_membership("legacy_user").await.unwrap());
    assert!(registrar.check_membership("not a valid name").await.is_ok());
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_lookup_receives_trimmed_name_once() {
    let mut lookup = MockLookup::new();
    lookup
        .expect_lookup()
        .with(eq("DevUser"))
        .times(1)
        .returning(|_| {
            Ok(vec![Candidate {
                id: 314u64.into(),
                name: "devuser".to_string(),
                display_name: None,
            }])
        });

    let store = Arc::new(MemoryDocumentStore::default());
    let registrar = WhitelistRegistrar::new(
        IdentityVerifier::new(Arc::new(lookup)),
        store.clone(),
        MutationQueue::spawn(),
        PersistOptions::default(),
    );

    let registration = registrar.register("  DevUser\n").await.unwrap();
    assert_eq!(registration.canonical_name, "devuser");
    assert_eq!(registration.identity.display_name_or_name(), "devuser");
    assert_eq!(store.content(), "devuser");
}

#[tokio::test]
async fn test_upstream_errors_propagate_unchanged() {
    let mut lookup = MockLookup::new();
    lookup.expect_lookup().times(1).returning(|_| {
        Err(Error::RateLimited {
            service: "identity service".to_string(),
        })
    });

    let store = Arc::new(MemoryDocumentStore::default());
    let registrar = WhitelistRegistrar::new(
        IdentityVerifier::new(Arc::new(lookup)),
        store.clone(),
        MutationQueue::spawn(),
        PersistOptions::default(),
    );

    let err = registrar.register("alice").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert!(err.is_retryable());
    assert_eq!(store.write_count(), 0);
}
