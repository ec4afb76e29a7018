//! Configuration loading for the `wayfinder` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.wayfinder/config.toml` (user)
//! 3. `/etc/wayfinder/config.toml` (system)
//!
//! Unlike an explicit path, the implicit locations are optional: with no
//! file present every setting takes its default.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::{DEFAULT_FALLBACK_HOST, ResolverConfig, WayfinderBuilder};
use crate::{Result, WayfinderError};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateways: GatewaysConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Where candidates come from and what to use when none work.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaysConfig {
    /// Static gateway hosts. Ignored when `directory_url` is set.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,
    /// JSON gateway listing to fetch candidates from.
    #[serde(default)]
    pub directory_url: Option<String>,
    /// Host used when no gateway can be ranked (default: arweave.net).
    #[serde(default = "default_fallback_host")]
    pub fallback_host: String,
    /// Limit on fetching the directory, in seconds (default: 10).
    #[serde(default = "default_directory_timeout_secs")]
    pub directory_timeout_secs: u64,
}

impl Default for GatewaysConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            directory_url: None,
            fallback_host: default_fallback_host(),
            directory_timeout_secs: default_directory_timeout_secs(),
        }
    }
}

fn default_hosts() -> Vec<String> {
    vec![DEFAULT_FALLBACK_HOST.to_string()]
}

fn default_fallback_host() -> String {
    DEFAULT_FALLBACK_HOST.to_string()
}

fn default_directory_timeout_secs() -> u64 {
    10
}

/// Probe settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Per-probe timeout in seconds (default: 5).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Candidates probed per ranking pass (default: 10).
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// URL scheme: "https" or "http" (default: "https").
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_candidates: default_max_candidates(),
            scheme: default_scheme(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_candidates() -> usize {
    10
}

fn default_scheme() -> String {
    "https".to_string()
}

/// Cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Directory holding `store.json` (default: `~/.cache/wayfinder`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Ranking lifetime in seconds (default: 900).
    #[serde(default = "default_gateway_ttl_secs")]
    pub gateway_ttl_secs: u64,
    /// Resource availability lifetime in seconds (default: 3600).
    #[serde(default = "default_resource_ttl_secs")]
    pub resource_ttl_secs: u64,
    /// Check that the chosen gateway serves each resource (default: true).
    #[serde(default = "default_verify")]
    pub verify_resources: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            dir: None,
            gateway_ttl_secs: default_gateway_ttl_secs(),
            resource_ttl_secs: default_resource_ttl_secs(),
            verify_resources: default_verify(),
        }
    }
}

fn default_gateway_ttl_secs() -> u64 {
    15 * 60
}

fn default_resource_ttl_secs() -> u64 {
    60 * 60
}

fn default_verify() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.wayfinder/config.toml`
    /// 3. `/etc/wayfinder/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WayfinderError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            WayfinderError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(WayfinderError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".wayfinder").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/wayfinder/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Path of the persistent store file.
    pub fn store_path(&self) -> PathBuf {
        match &self.cache.dir {
            Some(dir) => dir.join("store.json"),
            None => crate::cache::store::default_store_path(),
        }
    }

    /// Resolver settings derived from this file.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::new()
            .fallback_host(self.gateways.fallback_host.clone())
            .max_candidates(self.probe.max_candidates)
            .probe_timeout(Duration::from_secs(self.probe.timeout_secs))
            .directory_timeout(Duration::from_secs(self.gateways.directory_timeout_secs))
            .scheme(self.probe.scheme.clone())
            .gateway_ttl(Duration::from_secs(self.cache.gateway_ttl_secs))
            .resource_ttl(Duration::from_secs(self.cache.resource_ttl_secs))
            .verify_resources(self.cache.verify_resources)
    }

    /// A builder with this file's gateway source, store and settings applied.
    pub fn builder(&self) -> WayfinderBuilder {
        let builder = crate::Wayfinder::builder()
            .config(self.resolver_config())
            .file_store(self.store_path());
        match &self.gateways.directory_url {
            Some(url) => builder.directory_url(url.clone()),
            None => builder.gateways(self.gateways.hosts.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.gateways.hosts, vec!["arweave.net".to_string()]);
        assert_eq!(config.gateways.fallback_host, "arweave.net");
        assert_eq!(config.gateways.directory_timeout_secs, 10);
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.probe.max_candidates, 10);
        assert_eq!(config.cache.gateway_ttl_secs, 900);
        assert_eq!(config.cache.resource_ttl_secs, 3600);
        assert!(config.cache.verify_resources);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [gateways]
            hosts = ["ar-io.dev", "permagate.io"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.gateways.hosts.len(), 2);
        // Defaults preserved
        assert_eq!(config.gateways.fallback_host, "arweave.net");
        assert_eq!(config.probe.scheme, "https");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [gateways]
            directory_url = "https://example.com/gateways.json"
            fallback_host = "ar-io.dev"
            directory_timeout_secs = 3

            [probe]
            timeout_secs = 2
            max_candidates = 4
            scheme = "http"

            [cache]
            dir = "/tmp/wayfinder"
            gateway_ttl_secs = 60
            resource_ttl_secs = 120
            verify_resources = false
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.gateways.directory_url.as_deref(),
            Some("https://example.com/gateways.json")
        );
        assert_eq!(
            config.store_path(),
            PathBuf::from("/tmp/wayfinder/store.json")
        );

        let resolver = config.resolver_config();
        assert_eq!(resolver.fallback_host, "ar-io.dev");
        assert_eq!(resolver.probe_timeout, Duration::from_secs(2));
        assert_eq!(resolver.directory_timeout, Duration::from_secs(3));
        assert_eq!(resolver.max_candidates, 4);
        assert_eq!(resolver.scheme, "http");
        assert_eq!(resolver.gateway_ttl, Duration::from_secs(60));
        assert_eq!(resolver.resource_ttl, Duration::from_secs(120));
        assert!(!resolver.verify_resources);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[probe]\ntimeout_secs = 9\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.probe.timeout_secs, 9);
    }

    #[test]
    fn malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[probe\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, WayfinderError::Configuration(_)));
    }
}
