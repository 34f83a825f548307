//! Collaborator seams.
//!
//! The planner core only talks to routing, storage and geocoding services
//! through these traits. HTTP and file-backed implementations live in
//! their own modules; tests supply mocks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::archive::{ImportPosition, SavedRoute};
use crate::error::{GeocodingError, RoutingError, StorageError};

/// Travel mode requested from the routing service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Costing {
    Auto,
    Bicycle,
    #[default]
    Pedestrian,
    Motorcycle,
}

/// A routing request: locations in visiting order.
///
/// Each location is (latitude, longitude).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub locations: Vec<(f64, f64)>,
    pub costing: Costing,
}

impl RouteRequest {
    pub fn pedestrian(locations: Vec<(f64, f64)>) -> Self {
        Self {
            locations,
            costing: Costing::Pedestrian,
        }
    }
}

/// One leg between consecutive locations.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Encoded polyline at six-digit precision.
    pub shape: String,
    pub length_km: f64,
    pub time_s: f64,
}

/// Whole-trip figures, passed through from the routing service as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub length_km: f64,
    pub time_s: f64,
    pub has_toll: bool,
    pub has_highway: bool,
    pub has_ferry: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub legs: Vec<RouteLeg>,
    pub summary: RouteSummary,
}

/// Computes a path through an ordered list of locations.
pub trait RoutingProvider {
    /// Must give up and return [`RoutingError::Timeout`] once `timeout` has
    /// elapsed.
    fn compute_route(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<RouteResponse, RoutingError>;
}

impl<P: RoutingProvider + ?Sized> RoutingProvider for &P {
    fn compute_route(
        &self,
        request: &RouteRequest,
        timeout: Duration,
    ) -> Result<RouteResponse, RoutingError> {
        (**self).compute_route(request, timeout)
    }
}

/// Persistence for saved routes.
///
/// `list` returns routes in collection order. Each call is one atomic unit:
/// readers never observe a partially applied write.
pub trait RouteStorage {
    fn list(&self) -> Result<Vec<SavedRoute>, StorageError>;

    fn get(&self, id: &str) -> Result<Option<SavedRoute>, StorageError>;

    /// Replace the route with the same id in place, or append it.
    fn put(&self, route: SavedRoute) -> Result<(), StorageError>;

    /// Remove the route with `id`; absent ids are ignored.
    fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// Replace the whole collection.
    fn replace_all(&self, routes: Vec<SavedRoute>) -> Result<(), StorageError>;

    /// Add `routes` in order at one end of the collection, in the same
    /// atomic unit as the read of the existing routes.
    fn splice(&self, routes: Vec<SavedRoute>, position: ImportPosition) -> Result<(), StorageError>;
}

/// An address search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Looks up coordinates for a free-form address.
pub trait GeocodingProvider {
    fn search(&self, query: &str) -> Result<Vec<GeocodingResult>, GeocodingError>;
}
