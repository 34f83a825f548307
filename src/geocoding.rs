//! GSI address search adapter.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::GeocodingError;
use crate::traits::{GeocodingProvider, GeocodingResult};

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://msearch.gsi.go.jp/address-search/AddressSearch".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GsiGeocoder {
    config: GeocoderConfig,
    client: reqwest::blocking::Client,
}

impl GsiGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeocodingProvider for GsiGeocoder {
    fn search(&self, query: &str) -> Result<Vec<GeocodingResult>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("q", query)])
            .send()?;
        if !response.status().is_success() {
            return Err(GeocodingError::Status(response.status().as_u16()));
        }

        let features: Vec<GsiFeature> = response.json()?;
        debug!(query, hits = features.len(), "address search finished");
        Ok(features.into_iter().map(GeocodingResult::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GsiFeature {
    geometry: GsiGeometry,
    properties: GsiProperties,
}

#[derive(Debug, Deserialize)]
struct GsiGeometry {
    /// [longitude, latitude]
    coordinates: (f64, f64),
}

#[derive(Debug, Deserialize)]
struct GsiProperties {
    title: String,
}

impl From<GsiFeature> for GeocodingResult {
    fn from(feature: GsiFeature) -> Self {
        let (lng, lat) = feature.geometry.coordinates;
        GeocodingResult {
            lat,
            lng,
            address: feature.properties.title,
        }
    }
}
