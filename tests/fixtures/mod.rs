//! Test fixtures for walk-planner.
//!
//! Provides:
//! - Real central-Tokyo locations
//! - Valhalla response builders and a scripted routing provider

#![allow(dead_code)]

pub mod tokyo_locations;

pub use tokyo_locations::*;

use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};
use walk_planner::error::RoutingError;
use walk_planner::polyline::{PRECISION_6, encode};
use walk_planner::traits::{RouteLeg, RouteRequest, RouteResponse, RouteSummary, RoutingProvider};

/// Valhalla `/route` body with one leg per shape.
pub fn valhalla_response(shapes: &[String]) -> Value {
    let summary = json!({
        "has_time_restrictions": false,
        "has_toll": false,
        "has_highway": false,
        "has_ferry": false,
        "min_lat": 35.67,
        "min_lon": 139.65,
        "max_lat": 35.68,
        "max_lon": 139.66,
        "time": 600,
        "length": 0.8,
        "cost": 600
    });
    json!({
        "trip": {
            "locations": [],
            "legs": shapes
                .iter()
                .map(|shape| json!({ "maneuvers": [], "summary": summary, "shape": shape }))
                .collect::<Vec<_>>(),
            "summary": summary,
            "status_message": "Found route between points",
            "status": 0,
            "units": "kilometers",
            "language": "ja-JP"
        }
    })
}

/// Provider that walks straight between requested locations, one leg per
/// pair, and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    pub fail: bool,
    pub requests: Mutex<Vec<RouteRequest>>,
}

impl ScriptedProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl RoutingProvider for ScriptedProvider {
    fn compute_route(
        &self,
        request: &RouteRequest,
        _timeout: Duration,
    ) -> Result<RouteResponse, RoutingError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(RoutingError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        let legs = request
            .locations
            .windows(2)
            .map(|pair| RouteLeg {
                shape: encode(pair, PRECISION_6),
                length_km: 1.25,
                time_s: 900.0,
            })
            .collect::<Vec<_>>();
        let count = legs.len() as f64;
        Ok(RouteResponse {
            legs,
            summary: RouteSummary {
                length_km: 1.25 * count,
                time_s: 900.0 * count,
                ..RouteSummary::default()
            },
        })
    }
}
