//! Cached best-gateway resolution.
//!
//! # Lookup order
//!
//! 1. Gateway cache, memory tier.
//! 2. Gateway cache, persistent tier (promoted to memory on hit).
//! 3. Ranking pass: list the directory, probe the first `max_candidates`
//!    concurrently, keep the healthy ones sorted by latency, persist.
//!
//! Only one ranking pass runs at a time per resolver. Callers that miss
//! while a pass is in flight wait for it and reuse its outcome instead of
//! starting their own.
//!
//! # Degradation
//!
//! Nothing here returns an error, and nothing waits unbounded: the directory
//! listing is limited by `directory_timeout`. A failing, stalled or empty
//! directory, or a pass where no gateway answers, resolves to the
//! configured fallback host, and nothing is cached so the next call tries
//! again.
//!
//! # Resource verification
//!
//! Gateway health and resource availability are separate questions. With
//! verification on, [`best_gateway_for`](GatewayResolver::best_gateway_for)
//! also checks that the chosen gateway serves the resource, walking down the
//! ranking if it doesn't (the head alone, then the rest concurrently). Availability answers are cached per resource and
//! remember the gateway they were checked against; an answer is only reused
//! for that gateway, and only while it is still in the current ranking.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ranking::{DEFAULT_MAX_CANDIDATES, Ranker};
use super::routing::{build_url_with_scheme, clean_gateway, is_content_address};
use crate::cache::{CacheConfig, KeyValueStore, TtlCache};
use crate::clock::Clock;
use crate::directory::GatewayDirectory;
use crate::probe::{DEFAULT_PROBE_TIMEOUT, HealthProbe};
use crate::telemetry;
use crate::types::{GatewayCacheEntry, GatewayCandidate, ResourceAvailabilityEntry};

/// Host used whenever no better gateway can be determined.
pub const DEFAULT_FALLBACK_HOST: &str = "arweave.net";

/// Default lifetime of a ranking result.
pub const DEFAULT_GATEWAY_TTL: Duration = Duration::from_secs(15 * 60);

/// Default limit on one directory listing.
pub const DEFAULT_DIRECTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default lifetime of a resource availability answer.
pub const DEFAULT_RESOURCE_TTL: Duration = Duration::from_secs(60 * 60);

/// Gateway cache key; there is only ever one ranking.
const GATEWAY_KEY: &str = "best";

/// Resolver tuning.
///
/// ```rust
/// # use wayfinder::ResolverConfig;
/// # use std::time::Duration;
/// let config = ResolverConfig::new()
///     .fallback_host("ar-io.dev")
///     .gateway_ttl(Duration::from_secs(300))
///     .verify_resources(false);
/// assert_eq!(config.max_candidates, 10);
/// ```
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Host returned when resolution can't do better. Default: `arweave.net`.
    pub fallback_host: String,
    /// Candidates probed per ranking pass. Default: 10.
    pub max_candidates: usize,
    /// Per-probe timeout. Default: 5s.
    pub probe_timeout: Duration,
    /// Limit on one directory listing; expiry counts as a directory
    /// failure. Default: 10s.
    pub directory_timeout: Duration,
    /// Lifetime of a ranking. Default: 15 minutes.
    pub gateway_ttl: Duration,
    /// Lifetime of a resource availability answer. Default: 1 hour.
    pub resource_ttl: Duration,
    /// Whether `best_gateway_for` checks the resource itself. Default: true.
    pub verify_resources: bool,
    /// URL scheme for probes and built URLs. Default: `https`.
    pub scheme: String,
    /// In-memory capacity of the resource cache. Default: 10,000.
    pub max_cached_resources: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fallback_host: DEFAULT_FALLBACK_HOST.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            directory_timeout: DEFAULT_DIRECTORY_TIMEOUT,
            gateway_ttl: DEFAULT_GATEWAY_TTL,
            resource_ttl: DEFAULT_RESOURCE_TTL,
            verify_resources: true,
            scheme: "https".to_string(),
            max_cached_resources: 10_000,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback_host(mut self, host: impl Into<String>) -> Self {
        self.fallback_host = host.into();
        self
    }

    pub fn max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn directory_timeout(mut self, timeout: Duration) -> Self {
        self.directory_timeout = timeout;
        self
    }

    pub fn gateway_ttl(mut self, ttl: Duration) -> Self {
        self.gateway_ttl = ttl;
        self
    }

    pub fn resource_ttl(mut self, ttl: Duration) -> Self {
        self.resource_ttl = ttl;
        self
    }

    pub fn verify_resources(mut self, enabled: bool) -> Self {
        self.verify_resources = enabled;
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn max_cached_resources(mut self, n: u64) -> Self {
        self.max_cached_resources = n;
        self
    }
}

/// Resolves the best gateway for the process, with two-tier caching.
///
/// Construct through [`Wayfinder::builder()`](crate::Wayfinder::builder) and
/// share one instance (e.g. in an `Arc`); each instance owns its caches.
pub struct GatewayResolver {
    directory: Arc<dyn GatewayDirectory>,
    prober: Arc<dyn HealthProbe>,
    ranker: Ranker,
    gateways: TtlCache<&'static str, GatewayCacheEntry>,
    resources: TtlCache<String, ResourceAvailabilityEntry>,
    clock: Arc<dyn Clock>,
    config: ResolverConfig,
    refresh_lock: Mutex<()>,
    passes: AtomicU64,
}

impl GatewayResolver {
    pub(crate) fn new(
        directory: Arc<dyn GatewayDirectory>,
        prober: Arc<dyn HealthProbe>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: ResolverConfig,
    ) -> Self {
        let ranker = Ranker::new(prober.clone())
            .max_candidates(config.max_candidates)
            .clock(clock.clone());
        let gateways = TtlCache::new(
            "gateway",
            &CacheConfig::new().max_entries(1).ttl(config.gateway_ttl),
            store.clone(),
            clock.clone(),
        );
        let resources = TtlCache::new(
            "resource",
            &CacheConfig::new()
                .max_entries(config.max_cached_resources)
                .ttl(config.resource_ttl),
            store,
            clock.clone(),
        );
        Self {
            directory,
            prober,
            ranker,
            gateways,
            resources,
            clock,
            config,
            refresh_lock: Mutex::new(()),
            passes: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The configured fallback host, cleaned of scheme and trailing slash.
    pub fn fallback_host(&self) -> &str {
        clean_gateway(&self.config.fallback_host)
    }

    /// The cached ranking, if one is fresh. Never probes.
    pub async fn cached_entry(&self) -> Option<GatewayCacheEntry> {
        self.gateways.read(&GATEWAY_KEY).await
    }

    /// The current ranking: cached if fresh, otherwise from a ranking pass.
    ///
    /// `None` means no gateway could be ranked; callers use the fallback.
    pub async fn best_entry(&self) -> Option<GatewayCacheEntry> {
        if let Some(entry) = self.cached_entry().await {
            return Some(entry);
        }

        let seen = self.passes.load(Ordering::SeqCst);
        let _guard = self.refresh_lock.lock().await;
        if self.passes.load(Ordering::SeqCst) != seen {
            // A pass finished while we waited; take its outcome.
            return self.cached_entry().await;
        }
        self.run_pass().await
    }

    /// Run a ranking pass now, ignoring any cached ranking.
    pub async fn refresh(&self) -> Option<GatewayCacheEntry> {
        let _guard = self.refresh_lock.lock().await;
        self.run_pass().await
    }

    /// Host of the best gateway, or the fallback host.
    pub async fn best_gateway(&self) -> String {
        match self.best_entry().await {
            Some(entry) => entry.best_host,
            None => self.fallback_host().to_string(),
        }
    }

    /// Best gateway that also serves `resource` (optionally a sub-name of
    /// `parent`).
    ///
    /// With verification disabled this is [`best_gateway`](Self::best_gateway).
    pub async fn best_gateway_for(&self, resource: &str, parent: Option<&str>) -> String {
        let Some(entry) = self.best_entry().await else {
            return self.fallback_host().to_string();
        };
        if !self.config.verify_resources {
            return entry.best_host;
        }

        let key = resource_key(resource, parent);
        let cached = self.resources.read(&key).await;

        if let Some(cached) = &cached {
            if cached.available && entry.hosts().any(|h| cached.applies_to(h)) {
                debug!(resource = %key, gateway = %cached.gateway, "resource availability cached");
                return cached.gateway.clone();
            }
        }

        let unchecked: Vec<&str> = entry
            .hosts()
            .filter(|h| {
                !cached
                    .as_ref()
                    .is_some_and(|c| !c.available && c.applies_to(h))
            })
            .collect();

        if let Some(host) = self.first_serving(resource, parent, &unchecked).await {
            self.record_availability(&key, host, true).await;
            return host.to_string();
        }

        self.record_availability(&key, &entry.best_host, false).await;
        warn!(resource = %key, "no ranked gateway serves resource, using fallback");
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => "resource_unavailable")
            .increment(1);
        self.fallback_host().to_string()
    }

    /// First of `hosts` (in order) that serves the resource.
    ///
    /// The head is checked alone since it usually answers; the rest are
    /// checked concurrently. Worst case is two probe timeouts.
    async fn first_serving<'h>(
        &self,
        resource: &str,
        parent: Option<&str>,
        hosts: &[&'h str],
    ) -> Option<&'h str> {
        let (&head, rest) = hosts.split_first()?;
        if self.serves(resource, parent, head).await {
            return Some(head);
        }
        let answers = join_all(rest.iter().map(|h| self.serves(resource, parent, h))).await;
        rest.iter()
            .zip(answers)
            .find_map(|(&host, available)| available.then_some(host))
    }

    async fn serves(&self, resource: &str, parent: Option<&str>, host: &str) -> bool {
        let url = build_url_with_scheme(&self.config.scheme, resource, host, parent);
        let available = self.prober.is_available(&url).await;
        if !available {
            debug!(%url, gateway = host, "resource not served by gateway");
        }
        available
    }

    /// Fetchable URL for `name` on the best gateway that serves it.
    pub async fn routable_url(&self, name: &str, parent: Option<&str>) -> String {
        let gateway = self.best_gateway_for(name, parent).await;
        build_url_with_scheme(&self.config.scheme, name, &gateway, parent)
    }

    /// URL for `name` on the fallback host. No I/O.
    pub fn fallback_url(&self, name: &str, parent: Option<&str>) -> String {
        build_url_with_scheme(&self.config.scheme, name, self.fallback_host(), parent)
    }

    /// Forget the cached ranking and every cached availability answer.
    pub async fn clear(&self) {
        self.gateways.clear().await;
        self.resources.clear().await;
    }

    /// One ranking pass. Caller holds `refresh_lock`.
    async fn run_pass(&self) -> Option<GatewayCacheEntry> {
        let entry = self.rank_directory().await;
        self.passes.fetch_add(1, Ordering::SeqCst);
        if let Some(entry) = &entry {
            self.gateways.write(GATEWAY_KEY, entry.clone()).await;
        }
        entry
    }

    async fn rank_directory(&self) -> Option<GatewayCacheEntry> {
        let limit = self.config.directory_timeout;
        let failure = match tokio::time::timeout(limit, self.directory.list()).await {
            Ok(Ok(candidates)) => return self.rank_candidates(candidates).await,
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!(
                "listing timed out after {}ms",
                limit.as_millis()
            ),
        };
        warn!(directory = self.directory.name(), error = %failure, "gateway directory unavailable, using fallback");
        metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => "directory_error").increment(1);
        None
    }

    async fn rank_candidates(
        &self,
        candidates: Vec<GatewayCandidate>,
    ) -> Option<GatewayCacheEntry> {
        if candidates.is_empty() {
            info!(
                directory = self.directory.name(),
                "gateway directory is empty, using fallback"
            );
            metrics::counter!(telemetry::RANKINGS_TOTAL, "outcome" => "no_candidates")
                .increment(1);
            metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => "no_candidates")
                .increment(1);
            return None;
        }

        let ranked = self.ranker.rank(&candidates).await;
        match GatewayCacheEntry::from_ranking(ranked, self.clock.now_ms()) {
            Some(entry) => {
                info!(
                    best = %entry.best_host,
                    healthy = entry.ranked_candidates.len(),
                    candidates = candidates.len(),
                    "selected gateway"
                );
                metrics::counter!(telemetry::RANKINGS_TOTAL, "outcome" => "selected")
                    .increment(1);
                Some(entry)
            }
            None => {
                warn!(
                    candidates = candidates.len(),
                    "no healthy gateways, using fallback"
                );
                metrics::counter!(telemetry::RANKINGS_TOTAL, "outcome" => "no_healthy")
                    .increment(1);
                metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => "no_healthy")
                    .increment(1);
                None
            }
        }
    }

    async fn record_availability(&self, key: &str, gateway: &str, available: bool) {
        let entry = ResourceAvailabilityEntry {
            resource_key: key.to_string(),
            gateway: gateway.to_string(),
            available,
            last_checked_ms: self.clock.now_ms(),
        };
        self.resources.write(key.to_string(), entry).await;
    }
}

/// Cache key for a resource: the name, or `{name}_{parent}` for sub-names.
/// Content addresses route without their parent, so they key without it too.
fn resource_key(resource: &str, parent: Option<&str>) -> String {
    match parent {
        Some(parent) if !is_content_address(resource) => format!("{resource}_{parent}"),
        _ => resource.to_string(),
    }
}
