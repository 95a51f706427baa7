//! Wikipedia image lookup client
//!
//! One MediaWiki query: search for the place, take the top page, return its
//! lead image at original resolution. Plenty of places have no usable image;
//! that is Ok(None), not an error.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::PlacesError;
use crate::config::PlacesConfig;

/// Wikipedia image lookup client
pub struct ImageClient {
    http: Client,
    base_url: String,
}

impl ImageClient {
    /// Create a client from configuration
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("wayplan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.image_url.clone(),
        })
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Look up a representative image URL for a place
    pub async fn image_url(&self, query: &str) -> Result<Option<String>, PlacesError> {
        debug!(%query, "image_url: called");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", "1"),
                ("prop", "pageimages"),
                ("piprop", "original"),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(PlacesError::ApiError {
                service: "wikipedia",
                status,
            });
        }

        let payload: WikiResponse = response.json().await?;
        let url = payload
            .query
            .map(|q| q.pages)
            .unwrap_or_default()
            .into_values()
            .find_map(|page| page.original.map(|img| img.source));

        debug!(found = url.is_some(), "image_url: resolved");
        Ok(url)
    }
}

// MediaWiki response types
//
// With gsrlimit=1 there is at most one entry in pages, keyed by page id.

#[derive(Debug, Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    original: Option<WikiImage>,
}

#[derive(Debug, Deserialize)]
struct WikiImage {
    source: String,
}
