//! Credential resolution
//!
//! Determines the management token and app key/secret pair used for outbound
//! platform calls. Database-sourced credentials are cached in a single global
//! slot and refreshed at most every five minutes; on any store failure the
//! resolver degrades to the process configuration, it never fails.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;

/// How long a database-sourced credential set stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Management token plus app key/secret pair. Fields may be empty when
/// neither the database nor the environment provides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub management_token: String,
    pub access_key: String,
    pub app_secret: String,
}

impl CredentialSet {
    /// Static credentials from the process configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            management_token: config.management_token.clone(),
            access_key: config.access_key.clone(),
            app_secret: config.app_secret.clone(),
        }
    }

    /// Whether the app key/secret pair needed to sign tokens is present.
    pub fn has_app_keys(&self) -> bool {
        !self.access_key.is_empty() && !self.app_secret.is_empty()
    }

    /// Whether the management token needed for room administration is present.
    pub fn has_management_token(&self) -> bool {
        !self.management_token.is_empty()
    }
}

/// Source of database-backed credential rows.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the most recently created active credential row, if any.
    async fn fetch_latest(&self) -> Result<Option<CredentialSet>>;
}

/// A credential set with the time it was fetched from the store.
#[derive(Debug, Clone)]
struct CachedEntry {
    credentials: CredentialSet,
    fetched_at: Instant,
}

impl CachedEntry {
    fn is_stale(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) >= CACHE_TTL
    }
}

/// Single global cache slot. Last successful store fetch wins and is shared
/// by all concurrent requests until expiry.
#[derive(Default)]
pub struct CredentialCache {
    slot: Mutex<Option<CachedEntry>>,
}

impl CredentialCache {
    /// Return the cached credentials if present and fresh at `now`.
    fn fresh(&self, now: Instant) -> Option<CredentialSet> {
        self.slot
            .lock()
            .as_ref()
            .filter(|entry| !entry.is_stale(now))
            .map(|entry| entry.credentials.clone())
    }

    fn store(&self, credentials: CredentialSet, now: Instant) {
        *self.slot.lock() = Some(CachedEntry {
            credentials,
            fetched_at: now,
        });
    }
}

/// Layered credential resolver: cache, then store, then process
/// configuration. The first non-failing layer wins.
pub struct CredentialResolver {
    fallback: CredentialSet,
    store: Option<Arc<dyn CredentialStore>>,
    cache: CredentialCache,
}

impl CredentialResolver {
    pub fn new(fallback: CredentialSet, store: Option<Arc<dyn CredentialStore>>) -> Self {
        Self {
            fallback,
            store,
            cache: CredentialCache::default(),
        }
    }

    /// Resolve the current best-effort credentials. Never fails; the result
    /// may carry empty strings when nothing is configured.
    pub async fn resolve(&self) -> CredentialSet {
        self.resolve_at(Instant::now()).await
    }

    /// Resolution with an explicit notion of "now", so staleness can be
    /// exercised without wall-clock coupling.
    pub(crate) async fn resolve_at(&self, now: Instant) -> CredentialSet {
        if let Some(credentials) = self.cache.fresh(now) {
            tracing::debug!("Using cached credentials");
            return credentials;
        }

        let Some(store) = &self.store else {
            return self.fallback.clone();
        };

        // The lock is only held for the slot read/write above and below,
        // never across the fetch. Racing refreshes both fetch and the last
        // write wins.
        match store.fetch_latest().await {
            Ok(Some(credentials)) => {
                tracing::info!("Credentials refreshed from settings store");
                self.cache.store(credentials.clone(), now);
                credentials
            }
            Ok(None) => {
                tracing::debug!("No active credential row, using process configuration");
                self.fallback.clone()
            }
            Err(e) => {
                tracing::warn!("Settings store fetch failed, using process configuration: {}", e);
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProxyError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn creds(tag: &str) -> CredentialSet {
        CredentialSet {
            management_token: format!("{}-mgmt", tag),
            access_key: format!("{}-key", tag),
            app_secret: format!("{}-secret", tag),
        }
    }

    /// Store returning a fixed row, counting calls.
    struct CountingStore {
        row: Option<CredentialSet>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingStore {
        fn with_row(row: CredentialSet) -> Arc<Self> {
            Arc::new(Self {
                row: Some(row),
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                row: None,
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                row: None,
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialStore for CountingStore {
        async fn fetch_latest(&self) -> Result<Option<CredentialSet>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProxyError::Config("store down".into()));
            }
            Ok(self.row.clone())
        }
    }

    #[test]
    fn entry_staleness_is_pure() {
        let t0 = Instant::now();
        let entry = CachedEntry {
            credentials: creds("db"),
            fetched_at: t0,
        };

        assert!(!entry.is_stale(t0));
        assert!(!entry.is_stale(t0 + CACHE_TTL - Duration::from_secs(1)));
        assert!(entry.is_stale(t0 + CACHE_TTL));
        assert!(entry.is_stale(t0 + CACHE_TTL + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn fresh_cache_skips_the_store() {
        let store = CountingStore::with_row(creds("db"));
        let resolver = CredentialResolver::new(creds("env"), Some(store.clone()));

        let t0 = Instant::now();
        assert_eq!(resolver.resolve_at(t0).await, creds("db"));
        assert_eq!(store.call_count(), 1);

        // Within the TTL every resolution is served from the slot.
        assert_eq!(
            resolver.resolve_at(t0 + Duration::from_secs(60)).await,
            creds("db")
        );
        assert_eq!(
            resolver.resolve_at(t0 + CACHE_TTL - Duration::from_secs(1)).await,
            creds("db")
        );
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn stale_cache_refreshes_exactly_once_per_call() {
        let store = CountingStore::with_row(creds("db"));
        let resolver = CredentialResolver::new(creds("env"), Some(store.clone()));

        let t0 = Instant::now();
        resolver.resolve_at(t0).await;
        assert_eq!(store.call_count(), 1);

        resolver.resolve_at(t0 + CACHE_TTL).await;
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn store_error_falls_back_and_leaves_cache_untouched() {
        let store = CountingStore::failing();
        let resolver = CredentialResolver::new(creds("env"), Some(store.clone()));

        let t0 = Instant::now();
        assert_eq!(resolver.resolve_at(t0).await, creds("env"));
        assert_eq!(store.call_count(), 1);

        // Nothing was cached, so the next call queries again.
        assert_eq!(resolver.resolve_at(t0).await, creds("env"));
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn absent_row_falls_back_without_caching() {
        let store = CountingStore::empty();
        let resolver = CredentialResolver::new(creds("env"), Some(store.clone()));

        let t0 = Instant::now();
        assert_eq!(resolver.resolve_at(t0).await, creds("env"));
        assert_eq!(resolver.resolve_at(t0).await, creds("env"));
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn no_store_resolves_to_process_configuration() {
        let resolver = CredentialResolver::new(creds("env"), None);
        assert_eq!(resolver.resolve().await, creds("env"));
    }

    #[test]
    fn credential_presence_checks() {
        let full = creds("a");
        assert!(full.has_app_keys());
        assert!(full.has_management_token());

        let empty = CredentialSet {
            management_token: String::new(),
            access_key: String::new(),
            app_secret: String::new(),
        };
        assert!(!empty.has_app_keys());
        assert!(!empty.has_management_token());

        let key_only = CredentialSet {
            access_key: "k".into(),
            ..empty.clone()
        };
        assert!(!key_only.has_app_keys());
    }
}
