//! Route path synthesis.
//!
//! Turns a point list into a drawable (latitude, longitude) path, either by
//! asking the routing provider or by joining the points with straight lines.
//! Provider failures never escape: they degrade to the straight line and are
//! reported through the error handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{FALLBACK_MESSAGE, RoutingError};
use crate::point::{Point, PointType};
use crate::polyline::{self, PRECISION_6, Polyline};
use crate::traits::{RouteRequest, RouteSummary, RoutingProvider};

type ErrorHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Where a synthesized path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Fewer than two points.
    Empty,
    /// Start or goal missing, so the provider was not asked.
    StraightLine,
    Routed,
    /// The provider failed and the straight line was used instead.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Call number; higher is newer.
    pub generation: u64,
    /// (latitude, longitude) pairs.
    pub path: Vec<(f64, f64)>,
    /// Provider figures, only for routed paths.
    pub summary: Option<RouteSummary>,
    pub source: PathSource,
}

pub struct RouteSynthesizer<P> {
    provider: P,
    timeout: Duration,
    generation: AtomicU64,
    on_error: Option<ErrorHandler>,
}

impl<P: RoutingProvider> RouteSynthesizer<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            generation: AtomicU64::new(0),
            on_error: None,
        }
    }

    /// Install the callback told about routing failures.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generation of the most recently started call.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True when no call has started since the one that produced `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Build the path for `points`.
    pub fn synthesize(&self, points: &[Point]) -> Synthesis {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if points.len() < 2 {
            return Synthesis {
                generation,
                path: Vec::new(),
                summary: None,
                source: PathSource::Empty,
            };
        }

        if !has_start_and_goal(points) {
            return Synthesis {
                generation,
                path: straight_line(points),
                summary: None,
                source: PathSource::StraightLine,
            };
        }

        match self.route(points) {
            Ok((path, summary)) => Synthesis {
                generation,
                path,
                summary: Some(summary),
                source: PathSource::Routed,
            },
            Err(err) => {
                warn!(error = %err, generation, "routing failed, falling back to straight line");
                if let Some(handler) = &self.on_error {
                    handler(FALLBACK_MESSAGE);
                }
                Synthesis {
                    generation,
                    path: straight_line(points),
                    summary: None,
                    source: PathSource::Fallback,
                }
            }
        }
    }

    /// Like [`synthesize`](Self::synthesize), but returns `None` when a newer
    /// call started while this one was waiting on the provider.
    pub fn synthesize_latest(&self, points: &[Point]) -> Option<Synthesis> {
        let synthesis = self.synthesize(points);
        if self.is_current(synthesis.generation) {
            Some(synthesis)
        } else {
            debug!(
                generation = synthesis.generation,
                current = self.current_generation(),
                "discarding stale route"
            );
            None
        }
    }

    fn route(&self, points: &[Point]) -> Result<(Vec<(f64, f64)>, RouteSummary), RoutingError> {
        let request = RouteRequest::pedestrian(by_order(points).map(Point::location).collect());
        let response = self.provider.compute_route(&request, self.timeout)?;
        let coordinates =
            polyline::decode_legs(response.legs.iter().map(|leg| leg.shape.as_str()), PRECISION_6)?;
        let path = Polyline::from_lng_lat(&coordinates).into_points();
        Ok((path, response.summary))
    }
}

/// Points joined in `order` sequence, as (latitude, longitude) pairs.
pub fn straight_line(points: &[Point]) -> Vec<(f64, f64)> {
    by_order(points).map(Point::location).collect()
}

fn by_order(points: &[Point]) -> impl Iterator<Item = &Point> {
    let mut sorted: Vec<&Point> = points.iter().collect();
    sorted.sort_by_key(|p| p.order);
    sorted.into_iter()
}

fn has_start_and_goal(points: &[Point]) -> bool {
    points.iter().any(|p| p.point_type == PointType::Start)
        && points.iter().any(|p| p.point_type == PointType::Goal)
}
