//! Builder for configuring resolver instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::GatewayResolver;
use super::resolver::ResolverConfig;
use super::routing::clean_gateway;
use crate::cache::{FileStore, KeyValueStore, MemoryStore};
use crate::clock::{Clock, SystemClock};
use crate::directory::{GatewayDirectory, HttpDirectory, StaticDirectory};
use crate::probe::{HealthProbe, HttpProber};
use crate::{Result, WayfinderError};

/// Main entry point for creating resolver instances.
pub struct Wayfinder;

impl Wayfinder {
    /// Create a new builder for configuring the resolver.
    pub fn builder() -> WayfinderBuilder {
        WayfinderBuilder::new()
    }
}

/// Builder for configuring resolver instances.
///
/// A gateway source (static hosts, a directory URL, or a custom
/// [`GatewayDirectory`]) is required. Everything else has a default:
/// [`HttpProber`] using the configured timeout and scheme, an in-memory
/// store, and the system clock.
#[derive(Default)]
pub struct WayfinderBuilder {
    directory: Option<Arc<dyn GatewayDirectory>>,
    prober: Option<Arc<dyn HealthProbe>>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: ResolverConfig,
}

impl WayfinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed list of gateway hosts.
    pub fn gateways<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directory = Some(Arc::new(StaticDirectory::new(hosts)));
        self
    }

    /// Fetch gateways from a JSON listing at `url`.
    pub fn directory_url(mut self, url: impl Into<String>) -> Self {
        self.directory = Some(Arc::new(HttpDirectory::new(url)));
        self
    }

    /// Use a custom directory.
    pub fn directory(mut self, directory: Arc<dyn GatewayDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Use a custom health prober.
    pub fn prober(mut self, prober: Arc<dyn HealthProbe>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Use a custom persistent store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persist caches to a JSON file at `path`.
    pub fn file_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = Some(Arc::new(FileStore::new(path)));
        self
    }

    /// Use a custom clock (tests).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the whole resolver configuration.
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the fallback host.
    pub fn fallback_host(mut self, host: impl Into<String>) -> Self {
        self.config.fallback_host = host.into();
        self
    }

    /// Set the per-probe timeout.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Enable or disable per-resource verification.
    pub fn verify_resources(mut self, enabled: bool) -> Self {
        self.config.verify_resources = enabled;
        self
    }

    fn validate(&self) -> Result<()> {
        if clean_gateway(self.config.fallback_host.trim()).is_empty() {
            return Err(WayfinderError::InvalidInput(
                "fallback host must not be empty".to_string(),
            ));
        }
        if self.config.max_candidates == 0 {
            return Err(WayfinderError::Configuration(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if !matches!(self.config.scheme.as_str(), "http" | "https") {
            return Err(WayfinderError::Configuration(format!(
                "unsupported scheme '{}' (expected http or https)",
                self.config.scheme
            )));
        }
        if self.config.probe_timeout.is_zero() {
            return Err(WayfinderError::Configuration(
                "probe timeout must be non-zero".to_string(),
            ));
        }
        if self.config.directory_timeout.is_zero() {
            return Err(WayfinderError::Configuration(
                "directory timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the resolver.
    pub fn build(self) -> Result<GatewayResolver> {
        self.validate()?;
        let directory = self.directory.ok_or(WayfinderError::NoDirectory)?;

        let prober = self.prober.unwrap_or_else(|| {
            Arc::new(
                HttpProber::new()
                    .timeout(self.config.probe_timeout)
                    .scheme(self.config.scheme.clone()),
            )
        });
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(GatewayResolver::new(
            directory,
            prober,
            store,
            clock,
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_directory_fails() {
        let err = Wayfinder::builder().build().err().unwrap();
        assert!(matches!(err, WayfinderError::NoDirectory));
    }

    #[test]
    fn build_with_gateways() {
        let resolver = Wayfinder::builder()
            .gateways(["a.example"])
            .fallback_host("https://ar-io.dev/")
            .build()
            .unwrap();
        assert_eq!(resolver.fallback_host(), "ar-io.dev");
    }

    #[test]
    fn empty_fallback_rejected() {
        let err = Wayfinder::builder()
            .gateways(["a.example"])
            .fallback_host("https://")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, WayfinderError::InvalidInput(_)));
    }

    #[test]
    fn zero_candidates_rejected() {
        let err = Wayfinder::builder()
            .gateways(["a.example"])
            .config(ResolverConfig::new().max_candidates(0))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }

    #[test]
    fn zero_directory_timeout_rejected() {
        let err = Wayfinder::builder()
            .gateways(["a.example"])
            .config(ResolverConfig::new().directory_timeout(Duration::ZERO))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }

    #[test]
    fn unknown_scheme_rejected() {
        let err = Wayfinder::builder()
            .gateways(["a.example"])
            .config(ResolverConfig::new().scheme("ftp"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }
}
