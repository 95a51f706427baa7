//! Photon geocoding client
//!
//! Free-text place resolution against a Photon instance (komoot's public one
//! by default). Photon speaks GeoJSON: coordinates arrive as [lng, lat].

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use super::PlacesError;
use crate::config::PlacesConfig;
use crate::itinerary::Coordinates;

/// A city autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySuggestion {
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl CitySuggestion {
    /// Display label, e.g. "Portland, Oregon, United States"
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        if let Some(country) = &self.country {
            parts.push(country.clone());
        }
        parts.join(", ")
    }
}

/// Photon geocoding client
pub struct GeocodeClient {
    http: Client,
    base_url: String,
}

impl GeocodeClient {
    /// Create a client from configuration
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("wayplan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.geocode_url.clone(),
        })
    }

    #[cfg(test)]
    fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Resolve a free-text place name to coordinates
    ///
    /// Returns Ok(None) when Photon has no match; the caller decides whether
    /// that matters.
    pub async fn coordinates(&self, place: &str) -> Result<Option<Coordinates>, PlacesError> {
        debug!(%place, "coordinates: called");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", place), ("limit", "1"), ("lang", "en")])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(PlacesError::ApiError {
                service: "photon",
                status,
            });
        }

        let payload: PhotonResponse = response.json().await?;
        let coords = payload.features.into_iter().next().and_then(|feature| {
            let geometry = feature.geometry?;
            // GeoJSON order: [lng, lat]
            match geometry.coordinates.as_slice() {
                [lng, lat, ..] => Some(Coordinates { lat: *lat, lng: *lng }),
                _ => None,
            }
        });

        debug!(?coords, "coordinates: resolved");
        Ok(coords)
    }

    /// City autocomplete: up to 5 city/town suggestions for a query
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, PlacesError> {
        debug!(%query, "search_cities: called");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("limit", "5"),
                ("lang", "en"),
                ("osm_tag", "place:city"),
                ("osm_tag", "place:town"),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(PlacesError::ApiError {
                service: "photon",
                status,
            });
        }

        let payload: PhotonResponse = response.json().await?;
        let mut seen = HashSet::new();
        let suggestions = payload
            .features
            .into_iter()
            .filter_map(|feature| {
                let props = feature.properties;
                let suggestion = CitySuggestion {
                    name: props.name?,
                    state: props.state,
                    country: props.country,
                };
                seen.insert(suggestion.label()).then_some(suggestion)
            })
            .collect();

        Ok(suggestions)
    }
}

// Photon GeoJSON response types

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: Option<PhotonGeometry>,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_coordinates_swaps_geojson_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Senso-ji Temple".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("lang".into(), "en".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"features": [{"geometry": {"coordinates": [139.7967, 35.7148]}, "properties": {"name": "Senso-ji"}}]}"#,
            )
            .create_async()
            .await;

        let client = GeocodeClient::with_base_url(&server.url());
        let coords = client.coordinates("Senso-ji Temple").await.unwrap().unwrap();

        mock.assert_async().await;
        assert!((coords.lat - 35.7148).abs() < 1e-9);
        assert!((coords.lng - 139.7967).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_coordinates_no_match() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"features": []}"#)
            .create_async()
            .await;

        let client = GeocodeClient::with_base_url(&server.url());
        assert!(client.coordinates("Atlantis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_coordinates_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = GeocodeClient::with_base_url(&server.url());
        let err = client.coordinates("Tokyo").await.unwrap_err();
        assert!(matches!(
            err,
            PlacesError::ApiError {
                service: "photon",
                status: 502
            }
        ));
    }

    #[tokio::test]
    async fn test_search_cities_dedupes_and_skips_unnamed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "port".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"features": [
                    {"geometry": null, "properties": {"name": "Portland", "state": "Oregon", "country": "United States"}},
                    {"geometry": null, "properties": {"name": "Portland", "state": "Oregon", "country": "United States"}},
                    {"geometry": null, "properties": {"state": "Nowhere"}},
                    {"geometry": null, "properties": {"name": "Porto", "country": "Portugal"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = GeocodeClient::with_base_url(&server.url());
        let suggestions = client.search_cities("port").await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].label(), "Portland, Oregon, United States");
        assert_eq!(suggestions[1].label(), "Porto, Portugal");
    }
}
