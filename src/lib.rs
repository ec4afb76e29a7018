//! Wayfinder - health-ranked gateway selection with two-tier caching
//!
//! Picks the fastest healthy gateway out of a directory of mirrors, caches
//! the choice in memory and in a persistent key-value store, and turns
//! resource names into fetchable URLs on the chosen gateway. Every
//! network-facing path degrades to a fixed fallback host instead of
//! failing.
//!
//! # Example
//!
//! ```rust,no_run
//! use wayfinder::Wayfinder;
//!
//! #[tokio::main]
//! async fn main() -> wayfinder::Result<()> {
//!     let resolver = Wayfinder::builder()
//!         .gateways(["arweave.net", "ar-io.dev", "permagate.io"])
//!         .file_store(wayfinder::cache::store::default_store_path())
//!         .build()?;
//!
//!     println!("best gateway: {}", resolver.best_gateway().await);
//!     println!("{}", resolver.routable_url("ardrive", None).await);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod clock;
#[cfg(feature = "cli")]
pub mod config;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod probe;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, FileStore, KeyValueStore, MemoryStore, TtlCache};
pub use directory::{GatewayDirectory, HttpDirectory, StaticDirectory};
pub use error::{Result, WayfinderError};
pub use gateway::routing::{build_url, is_content_address};
pub use gateway::{GatewayResolver, Ranker, ResolverConfig, Wayfinder, WayfinderBuilder};
pub use probe::{HealthProbe, HttpProber};
pub use types::{
    GatewayCacheEntry, GatewayCandidate, GatewayProbeResult, ResourceAvailabilityEntry,
};
pub use version::{PKG_VERSION, version_string};
