//! Directory fetched from a JSON endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::GatewayDirectory;
use crate::probe::default_client;
use crate::types::GatewayCandidate;
use crate::{Result, WayfinderError};

/// Fetches the candidate pool from a URL.
///
/// Two body shapes are accepted:
///
/// - the AR.IO network listing, `{ "items": [ { "settings": { "fqdn": "…" } } ] }`
/// - a bare array, `[ { "host": "…" } ]`
#[derive(Clone)]
pub struct HttpDirectory {
    http: Client,
    url: String,
}

impl HttpDirectory {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(default_client(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawListing {
    Paged { items: Vec<RawGateway> },
    Bare(Vec<RawGateway>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGateway {
    Registered { settings: RawSettings },
    Plain { host: String },
}

#[derive(Deserialize)]
struct RawSettings {
    fqdn: String,
}

/// Parse a listing body into normalised candidates, dropping blank hosts.
fn parse_listing(json: &str) -> Result<Vec<GatewayCandidate>> {
    let listing: RawListing = serde_json::from_str(json)?;
    let raw = match listing {
        RawListing::Paged { items } => items,
        RawListing::Bare(items) => items,
    };
    Ok(raw
        .into_iter()
        .map(|g| match g {
            RawGateway::Registered { settings } => settings.fqdn,
            RawGateway::Plain { host } => host,
        })
        .map(GatewayCandidate::from)
        .filter(|c| !c.host.is_empty())
        .collect())
}

#[async_trait]
impl GatewayDirectory for HttpDirectory {
    fn name(&self) -> &str {
        "http"
    }

    async fn list(&self) -> Result<Vec<GatewayCandidate>> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WayfinderError::Api {
                status: status.as_u16(),
                message: format!("gateway directory fetch from {} failed", self.url),
            });
        }

        let body = response.text().await?;
        let candidates = parse_listing(&body)?;
        debug!(url = %self.url, count = candidates.len(), "fetched gateway directory");
        Ok(candidates)
    }
}
