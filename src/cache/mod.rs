//! Two-tier TTL caching.
//!
//! [`TtlCache`] layers a bounded in-process moka cache over a pluggable
//! [`KeyValueStore`]. It is instantiated twice by the resolver:
//!
//! - `"gateway"`: a single constant key holding the last
//!   [`GatewayCacheEntry`](crate::types::GatewayCacheEntry), 15 minute TTL.
//! - `"resource"`: one key per logical resource holding a
//!   [`ResourceAvailabilityEntry`](crate::types::ResourceAvailabilityEntry),
//!   1 hour TTL.
//!
//! # Freshness
//!
//! Every value is stamped with wall-clock milliseconds when written. Both
//! tiers decide freshness by comparing that stamp against the injected
//! [`Clock`], so a value promoted from the store keeps its original age.
//! moka's own TTL only bounds memory; it never makes a stale value look
//! fresh.
//!
//! # Failure handling
//!
//! Reads never fail. A store error, unparseable JSON or a schema mismatch
//! is logged and reported as a miss. Writes update memory first and then
//! persist; a persistence failure is logged and the memory write stands.
//!
//! There is no locking across read-modify-write cycles. Concurrent writers
//! race and the last write wins.

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, is_fresh};
use crate::telemetry;

/// Configuration for one [`TtlCache`] instance.
///
/// ```rust
/// # use wayfinder::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(900));
/// assert_eq!(config.ttl, Duration::from_secs(900));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries held in the in-process tier. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live measured from the write. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the in-process capacity.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Persisted record shape: the value plus its write stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stamped<V> {
    value: V,
    stored_at_ms: u64,
}

/// Generic two-tier cache with TTL-based invalidation.
///
/// Persistent keys are `"{namespace}:{key}"`, so several caches can share
/// one store.
pub struct TtlCache<K, V> {
    namespace: &'static str,
    ttl: Duration,
    memory: Cache<K, Stamped<V>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + Display + Send + Sync + 'static,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a cache in `namespace` over `store`.
    pub fn new(
        namespace: &'static str,
        config: &CacheConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let memory = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl.max(Duration::from_millis(1)))
            .build();
        Self {
            namespace,
            ttl: config.ttl,
            memory,
            store,
            clock,
        }
    }

    /// Namespace used for persistent keys and metric labels.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn store_key(&self, key: &K) -> String {
        format!("{}:{key}", self.namespace)
    }

    /// Look up `key`: memory first, then the persistent store.
    ///
    /// A fresh store hit is promoted into memory. Returns `None` on miss,
    /// expiry or any read/parse failure.
    pub async fn read(&self, key: &K) -> Option<V> {
        let now = self.clock.now_ms();

        if let Some(stamped) = self.memory.get(key).await {
            if is_fresh(stamped.stored_at_ms, now, self.ttl) {
                self.record_hit("memory");
                return Some(stamped.value);
            }
            self.memory.invalidate(key).await;
        }

        let store_key = self.store_key(key);
        let raw = match self.store.get(&store_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.record_miss();
                return None;
            }
            Err(e) => {
                warn!(cache = self.namespace, key = %store_key, error = %e, "cache store read failed");
                self.record_miss();
                return None;
            }
        };

        let stamped: Stamped<V> = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(e) => {
                warn!(cache = self.namespace, key = %store_key, error = %e, "corrupt cache entry");
                self.record_miss();
                return None;
            }
        };

        if !is_fresh(stamped.stored_at_ms, now, self.ttl) {
            debug!(cache = self.namespace, key = %store_key, "cache entry expired");
            self.record_miss();
            return None;
        }

        self.record_hit("store");
        let value = stamped.value.clone();
        self.memory.insert(key.clone(), stamped).await;
        Some(value)
    }

    /// Store `value` under `key`, stamped with the current time.
    ///
    /// Memory is updated before the store. Persistence is best-effort.
    pub async fn write(&self, key: K, value: V) {
        let stamped = Stamped {
            value,
            stored_at_ms: self.clock.now_ms(),
        };
        let store_key = self.store_key(&key);
        let json = serde_json::to_string(&stamped);
        self.memory.insert(key, stamped).await;

        let result = match json {
            Ok(json) => self.store.set(&store_key, json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(cache = self.namespace, key = %store_key, error = %e, "cache persist failed");
        }
    }

    /// Drop every entry in this namespace from both tiers.
    pub async fn clear(&self) {
        self.memory.invalidate_all();
        let prefix = format!("{}:", self.namespace);
        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(cache = self.namespace, error = %e, "cache store listing failed");
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(&prefix)) {
            if let Err(e) = self.store.remove(key).await {
                warn!(cache = self.namespace, key = %key, error = %e, "cache store remove failed");
            }
        }
    }

    fn record_hit(&self, tier: &'static str) {
        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => self.namespace, "tier" => tier)
            .increment(1);
    }

    fn record_miss(&self) {
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => self.namespace).increment(1);
    }
}
