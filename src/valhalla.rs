//! Valhalla HTTP adapter for route computation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;
use crate::traits::{Costing, RouteLeg, RouteRequest, RouteResponse, RouteSummary, RoutingProvider};

/// Environment variable overriding [`ValhallaConfig::base_url`].
pub const VALHALLA_URL_ENV: &str = "VALHALLA_URL";

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub language: String,
    pub units: String,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            language: "ja-JP".to_string(),
            units: "kilometers".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ValhallaConfig {
    /// Defaults, with the base URL taken from `VALHALLA_URL` when set.
    pub fn from_env() -> Self {
        Self::with_base_url(std::env::var(VALHALLA_URL_ENV).ok())
    }

    fn with_base_url(base_url: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ValhallaConfig {
        &self.config
    }

    /// Whether the service answers its status endpoint.
    pub fn status(&self) -> bool {
        let url = format!("{}/status", self.config.base_url);
        self.client
            .get(url)
            .timeout(STATUS_TIMEOUT)
            .send()
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }
}

impl RoutingProvider for ValhallaClient {
    fn compute_route(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<RouteResponse, RoutingError> {
        if request.locations.len() < 2 {
            return Err(RoutingError::InsufficientPoints);
        }

        let body = ValhallaRouteRequest {
            locations: request
                .locations
                .iter()
                .map(|&(lat, lon)| ValhallaLocation { lat, lon })
                .collect(),
            costing: request.costing,
            directions_options: DirectionsOptions {
                language: &self.config.language,
                units: &self.config.units,
            },
        };

        let url = format!("{}/route", self.config.base_url);
        debug!(locations = request.locations.len(), %url, "requesting route");

        let response = self.client.post(url).timeout(timeout).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RoutingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ValhallaRouteResponse = response.json()?;
        debug!(legs = parsed.trip.legs.len(), "route received");
        Ok(parsed.into())
    }
}

#[derive(Debug, Serialize)]
struct ValhallaRouteRequest<'a> {
    locations: Vec<ValhallaLocation>,
    costing: Costing,
    directions_options: DirectionsOptions<'a>,
}

#[derive(Debug, Serialize)]
struct ValhallaLocation {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize)]
struct DirectionsOptions<'a> {
    language: &'a str,
    units: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValhallaRouteResponse {
    trip: ValhallaTrip,
}

#[derive(Debug, Deserialize)]
struct ValhallaTrip {
    legs: Vec<ValhallaLeg>,
    summary: ValhallaSummary,
}

#[derive(Debug, Deserialize)]
struct ValhallaLeg {
    shape: String,
    summary: ValhallaSummary,
}

#[derive(Debug, Deserialize)]
struct ValhallaSummary {
    length: f64,
    time: f64,
    #[serde(default)]
    has_toll: bool,
    #[serde(default)]
    has_highway: bool,
    #[serde(default)]
    has_ferry: bool,
}

impl From<ValhallaRouteResponse> for RouteResponse {
    fn from(response: ValhallaRouteResponse) -> Self {
        let trip = response.trip;
        RouteResponse {
            legs: trip
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    shape: leg.shape,
                    length_km: leg.summary.length,
                    time_s: leg.summary.time,
                })
                .collect(),
            summary: RouteSummary {
                length_km: trip.summary.length,
                time_s: trip.summary.time,
                has_toll: trip.summary.has_toll,
                has_highway: trip.summary.has_highway,
                has_ferry: trip.summary.has_ferry,
            },
        }
    }
}
