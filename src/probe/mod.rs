//! Gateway health probing.
//!
//! A [`HealthProbe`] answers two questions: is this gateway reachable at all
//! ([`probe`](HealthProbe::probe)), and does it serve this particular URL
//! ([`is_available`](HealthProbe::is_available)). Neither can fail; every
//! failure mode (timeout, DNS, TLS, non-success status) collapses into an
//! unhealthy/unavailable answer so callers can treat all candidates alike.

mod http;

pub(crate) use http::default_client;
pub use http::{DEFAULT_PROBE_TIMEOUT, HttpProber};

use async_trait::async_trait;

use crate::types::GatewayProbeResult;

/// Health check seam used by the ranker and resolver.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe a gateway host. Unhealthy results carry `Duration::MAX` latency.
    async fn probe(&self, host: &str) -> GatewayProbeResult;

    /// Whether a concrete resource URL answers with a success status.
    async fn is_available(&self, url: &str) -> bool;
}
