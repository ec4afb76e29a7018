//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `wayfinder_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: probe outcome: "healthy" or "unhealthy"
//! - `cache`: cache namespace: "gateway" or "resource"
//! - `tier`: cache tier that answered: "memory" or "store"
//! - `reason`: why the fallback host was used

/// Total gateway probes issued.
///
/// Labels: `status` ("healthy" | "unhealthy").
pub const PROBES_TOTAL: &str = "wayfinder_probes_total";

/// Probe round-trip time in seconds (healthy probes only).
pub const PROBE_DURATION_SECONDS: &str = "wayfinder_probe_duration_seconds";

/// Total ranking passes.
///
/// Labels: `outcome` ("selected" | "no_healthy" | "no_candidates").
pub const RANKINGS_TOTAL: &str = "wayfinder_rankings_total";

/// Total cache hits.
///
/// Labels: `cache`, `tier`.
pub const CACHE_HITS_TOTAL: &str = "wayfinder_cache_hits_total";

/// Total cache misses.
///
/// Labels: `cache`.
pub const CACHE_MISSES_TOTAL: &str = "wayfinder_cache_misses_total";

/// Total resolutions that ended on the fallback host.
///
/// Labels: `reason` ("directory_error" | "no_candidates" | "no_healthy" |
/// "resource_unavailable").
pub const FALLBACKS_TOTAL: &str = "wayfinder_fallbacks_total";
