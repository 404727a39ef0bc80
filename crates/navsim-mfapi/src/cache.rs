//! Expiring cache in front of a [`NavProvider`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use navsim_core::{SchemeData, SchemeSummary};

use crate::error::ProviderError;
use crate::provider::NavProvider;

/// Upstream NAVs are published once a day; 12 hours keeps a session fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// The scheme list changes rarely, so it is kept for a day.
pub const SCHEME_LIST_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const SCHEME_LIST_KEY: &str = "/mf";

pub trait NavCache: Send + Sync {
    /// `None` on a miss or an expired entry.
    fn get(&self, key: &str) -> Option<SchemeData>;

    fn put(&self, key: &str, value: SchemeData, ttl: Duration);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Concurrent map of key to value with per-entry expiry.
///
/// Expired entries are evicted when read and swept on every insert.
pub struct TtlCache<V = SchemeData> {
    entries: DashMap<String, Entry<V>>,
}

impl TtlCache<SchemeData> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Live entries only.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if self.entries.remove_if(key, |_, e| e.is_expired(now)).is_some() {
            debug!("evicted expired cache entry {key}");
            return None;
        }
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&self, key: &str, value: V, ttl: Duration) {
        self.purge_expired();
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, e| !e.is_expired(now));
    }
}

impl NavCache for TtlCache<SchemeData> {
    fn get(&self, key: &str) -> Option<SchemeData> {
        self.lookup(key)
    }

    fn put(&self, key: &str, value: SchemeData, ttl: Duration) {
        self.insert(key, value, ttl);
    }
}

/// Serves from `cache` and falls through to `inner` on a miss.
pub struct CachedNavProvider<P, C> {
    inner: P,
    cache: C,
    ttl: Duration,
    list: TtlCache<Vec<SchemeSummary>>,
}

impl<P: NavProvider, C: NavCache> CachedNavProvider<P, C> {
    pub fn new(inner: P, cache: C, ttl: Duration) -> Self {
        Self {
            inner,
            cache,
            ttl,
            list: TtlCache::default(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

#[async_trait]
impl<P: NavProvider, C: NavCache> NavProvider for CachedNavProvider<P, C> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn fetch_scheme(&self, scheme_code: &str) -> Result<SchemeData, ProviderError> {
        if let Some(hit) = self.cache.get(scheme_code) {
            debug!("cache hit for scheme {scheme_code}");
            return Ok(hit);
        }
        debug!("cache miss for scheme {scheme_code}");
        let fresh = self.inner.fetch_scheme(scheme_code).await?;
        self.cache.put(scheme_code, fresh.clone(), self.ttl);
        Ok(fresh)
    }

    async fn fetch_scheme_list(&self) -> Result<Vec<SchemeSummary>, ProviderError> {
        if let Some(hit) = self.list.lookup(SCHEME_LIST_KEY) {
            debug!("cache hit for scheme list ({} schemes)", hit.len());
            return Ok(hit);
        }
        let fresh = self.inner.fetch_scheme_list().await?;
        self.list.insert(SCHEME_LIST_KEY, fresh.clone(), SCHEME_LIST_TTL);
        Ok(fresh)
    }
}
