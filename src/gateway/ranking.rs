//! Latency ranking over a candidate pool.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::probe::HealthProbe;
use crate::types::{GatewayCandidate, GatewayProbeResult};

/// Default cap on how many candidates one ranking pass probes.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Probes a capped prefix of the candidate pool concurrently and orders the
/// healthy responders fastest first.
///
/// Every probe runs at once, so a pass takes as long as the slowest single
/// probe (bounded by the prober's timeout). Failed probes are not retried.
///
/// Results are stamped with the ranker's clock at the start of the pass, so
/// `probed_at_ms` shares a time source with the cache entries built from it.
#[derive(Clone)]
pub struct Ranker {
    prober: Arc<dyn HealthProbe>,
    max_candidates: usize,
    clock: Arc<dyn Clock>,
}

impl Ranker {
    pub fn new(prober: Arc<dyn HealthProbe>) -> Self {
        Self {
            prober,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the clock used to stamp probe results.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set how many candidates (taken from the front of the list) are probed.
    pub fn max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    /// Probe and rank. The result holds healthy gateways only, sorted by
    /// ascending latency; it is empty when nothing answered.
    pub async fn rank(&self, candidates: &[GatewayCandidate]) -> Vec<GatewayProbeResult> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let probed_at_ms = self.clock.now_ms();
        let probes = candidates
            .iter()
            .take(self.max_candidates)
            .map(|c| self.prober.probe(&c.host));
        let results = join_all(probes).await;
        let probed = results.len();

        let mut healthy: Vec<_> = results
            .into_iter()
            .filter(|r| r.healthy)
            .map(|r| GatewayProbeResult { probed_at_ms, ..r })
            .collect();
        healthy.sort_by_key(|r| r.latency);

        debug!(probed, healthy = healthy.len(), "ranked gateways");
        healthy
    }

    /// The fastest healthy gateway, if any.
    pub async fn best(&self, candidates: &[GatewayCandidate]) -> Option<GatewayProbeResult> {
        self.rank(candidates).await.into_iter().next()
    }
}
