//! Gateway directory listings.
//!
//! A directory supplies the unordered pool of candidate gateways. The
//! ranker only needs each entry's host, so richer listings are projected
//! down to [`GatewayCandidate`] here.

mod http;

pub use http::HttpDirectory;

use async_trait::async_trait;

use crate::Result;
use crate::types::GatewayCandidate;

/// Source of candidate gateways.
#[async_trait]
pub trait GatewayDirectory: Send + Sync {
    /// Directory name for logging/debugging.
    fn name(&self) -> &str;

    /// List the current candidates. Order is whatever the source returns.
    async fn list(&self) -> Result<Vec<GatewayCandidate>>;
}

/// A fixed list of gateways. Hosts are normalised like any other
/// candidate; blank entries are dropped.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    candidates: Vec<GatewayCandidate>,
}

impl StaticDirectory {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: hosts
                .into_iter()
                .map(GatewayCandidate::new)
                .filter(|c| !c.host.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl GatewayDirectory for StaticDirectory {
    fn name(&self) -> &str {
        "static"
    }

    async fn list(&self) -> Result<Vec<GatewayCandidate>> {
        Ok(self.candidates.clone())
    }
}
