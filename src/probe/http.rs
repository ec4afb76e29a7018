//! HEAD-request prober over reqwest.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use super::HealthProbe;
use crate::clock::{Clock, SystemClock};
use crate::telemetry;
use crate::types::GatewayProbeResult;
use crate::version::USER_AGENT;

/// Hard per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared client setup: a `wayfinder/{version}` user agent.
///
/// Falls back to reqwest's default client if the builder fails.
pub(crate) fn default_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
}

/// Probes gateways with `HEAD {scheme}://{host}`.
///
/// Each request is raced against its own timeout; dropping the request
/// future on expiry cancels it.
#[derive(Clone)]
pub struct HttpProber {
    http: Client,
    timeout: Duration,
    scheme: String,
}

impl HttpProber {
    /// HTTPS prober with the default 5 second timeout.
    pub fn new() -> Self {
        Self::with_client(default_client())
    }

    /// Prober sharing an existing HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self {
            http,
            timeout: DEFAULT_PROBE_TIMEOUT,
            scheme: "https".to_string(),
        }
    }

    /// Set the per-probe timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the URL scheme used for gateway probes (for testing with wiremock).
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Issue a HEAD request and report whether a 2xx arrived in time.
    async fn head_ok(&self, url: &str) -> bool {
        let request = self.http.request(Method::HEAD, url).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let ok = response.status().is_success();
                if !ok {
                    debug!(%url, status = %response.status(), "probe returned non-success status");
                }
                ok
            }
            Ok(Err(e)) => {
                debug!(%url, error = %e, "probe request failed");
                false
            }
            Err(_) => {
                debug!(%url, timeout_ms = self.timeout.as_millis() as u64, "probe timed out");
                false
            }
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpProber {
    async fn probe(&self, host: &str) -> GatewayProbeResult {
        let probed_at_ms = SystemClock.now_ms();
        let url = format!("{}://{host}", self.scheme);
        let start = Instant::now();
        let healthy = self.head_ok(&url).await;
        let latency = start.elapsed();

        if healthy {
            metrics::counter!(telemetry::PROBES_TOTAL, "status" => "healthy").increment(1);
            metrics::histogram!(telemetry::PROBE_DURATION_SECONDS).record(latency.as_secs_f64());
            debug!(host, latency_ms = latency.as_millis() as u64, "gateway healthy");
            GatewayProbeResult::healthy(host, latency, probed_at_ms)
        } else {
            metrics::counter!(telemetry::PROBES_TOTAL, "status" => "unhealthy").increment(1);
            GatewayProbeResult::unhealthy(host, probed_at_ms)
        }
    }

    async fn is_available(&self, url: &str) -> bool {
        self.head_ok(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let prober = HttpProber::new()
            .timeout(Duration::from_millis(250))
            .scheme("http");
        assert_eq!(prober.timeout, Duration::from_millis(250));
        assert_eq!(prober.scheme, "http");
    }

    #[tokio::test]
    async fn unroutable_host_is_unhealthy() {
        // Port 9 on localhost is the discard service; almost never listening.
        let prober = HttpProber::new()
            .scheme("http")
            .timeout(Duration::from_millis(500));
        let result = prober.probe("127.0.0.1:9").await;
        assert!(!result.healthy);
        assert_eq!(result.latency, Duration::MAX);
    }
}
