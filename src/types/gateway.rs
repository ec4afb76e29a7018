//! Gateway identity, probe outcome and cached ranking types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gateway::routing::clean_gateway;

/// A gateway endpoint as listed by a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GatewayCandidate {
    /// DNS-resolvable host, optionally with a port (e.g. `"arweave.net"`).
    pub host: String,
}

impl GatewayCandidate {
    /// Create a candidate for the given host.
    ///
    /// The host is normalised the same way as the fallback host: surrounding
    /// whitespace, a leading `http://`/`https://` and one trailing `/` are
    /// stripped, so `"https://ar-io.dev/"` and `"ar-io.dev"` are the same
    /// candidate.
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into();
        Self {
            host: clean_gateway(host.trim()).to_string(),
        }
    }
}

impl From<&str> for GatewayCandidate {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

impl From<String> for GatewayCandidate {
    fn from(host: String) -> Self {
        Self::new(host)
    }
}

/// Outcome of probing a single gateway.
///
/// Unhealthy results always carry [`Duration::MAX`] as their latency, so a
/// latency sort places them last without special-casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayProbeResult {
    /// The probed host.
    pub host: String,
    /// Round-trip time of the probe.
    pub latency: Duration,
    /// Whether a success response arrived before the timeout.
    pub healthy: bool,
    /// When the probe was issued, in milliseconds since the Unix epoch.
    pub probed_at_ms: u64,
}

impl GatewayProbeResult {
    /// A successful probe.
    pub fn healthy(host: impl Into<String>, latency: Duration, probed_at_ms: u64) -> Self {
        Self {
            host: host.into(),
            latency,
            healthy: true,
            probed_at_ms,
        }
    }

    /// A failed probe (timeout, network error or non-success status).
    pub fn unhealthy(host: impl Into<String>, probed_at_ms: u64) -> Self {
        Self {
            host: host.into(),
            latency: Duration::MAX,
            healthy: false,
            probed_at_ms,
        }
    }

    /// Latency in fractional milliseconds; infinite for unhealthy results.
    pub fn latency_ms(&self) -> f64 {
        if self.healthy {
            self.latency.as_secs_f64() * 1_000.0
        } else {
            f64::INFINITY
        }
    }
}

/// The persisted outcome of a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayCacheEntry {
    /// Host of the fastest healthy gateway.
    pub best_host: String,
    /// All healthy gateways, fastest first.
    pub ranked_candidates: Vec<GatewayProbeResult>,
    /// When the ranking completed, in milliseconds since the Unix epoch.
    pub last_updated_ms: u64,
}

impl GatewayCacheEntry {
    /// Build an entry from a ranked list, taking index 0 as best.
    ///
    /// Returns `None` for an empty ranking.
    pub fn from_ranking(ranked: Vec<GatewayProbeResult>, now_ms: u64) -> Option<Self> {
        let best_host = ranked.first()?.host.clone();
        Some(Self {
            best_host,
            ranked_candidates: ranked,
            last_updated_ms: now_ms,
        })
    }

    /// Hosts in ranking order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.ranked_candidates.iter().map(|r| r.host.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_host_is_normalised() {
        assert_eq!(GatewayCandidate::new("https://ar-io.dev/").host, "ar-io.dev");
        assert_eq!(GatewayCandidate::from("http://127.0.0.1:8080").host, "127.0.0.1:8080");
        assert_eq!(GatewayCandidate::from(" permagate.io ".to_string()).host, "permagate.io");
        assert_eq!(GatewayCandidate::new("arweave.net").host, "arweave.net");
    }

    #[test]
    fn unhealthy_latency_is_infinite() {
        let r = GatewayProbeResult::unhealthy("a.example", 0);
        assert!(!r.healthy);
        assert_eq!(r.latency, Duration::MAX);
        assert!(r.latency_ms().is_infinite());
    }

    #[test]
    fn healthy_latency_ms() {
        let r = GatewayProbeResult::healthy("a.example", Duration::from_millis(120), 0);
        assert!((r.latency_ms() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entry_from_empty_ranking_is_none() {
        assert!(GatewayCacheEntry::from_ranking(vec![], 0).is_none());
    }

    #[test]
    fn entry_takes_first_as_best() {
        let ranked = vec![
            GatewayProbeResult::healthy("fast.example", Duration::from_millis(10), 1),
            GatewayProbeResult::healthy("slow.example", Duration::from_millis(90), 1),
        ];
        let entry = GatewayCacheEntry::from_ranking(ranked, 42).unwrap();
        assert_eq!(entry.best_host, "fast.example");
        assert_eq!(entry.last_updated_ms, 42);
        assert_eq!(
            entry.hosts().collect::<Vec<_>>(),
            vec!["fast.example", "slow.example"]
        );
    }

    #[test]
    fn unhealthy_result_survives_json() {
        let r = GatewayProbeResult::unhealthy("down.example", 7);
        let json = serde_json::to_string(&r).unwrap();
        let back: GatewayProbeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
