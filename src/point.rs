//! Route points and their roles.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum comment length, in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Characters of the first comment line shown in titles.
const TITLE_LENGTH: usize = 16;

/// Role of a point within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Start,
    Waypoint,
    Goal,
}

impl PointType {
    /// Role for the point at `index` in a route of `len` points.
    pub fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            PointType::Start
        } else if index + 1 == len {
            PointType::Goal
        } else {
            PointType::Waypoint
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PointType::Start => "スタート",
            PointType::Waypoint => "中継地点",
            PointType::Goal => "ゴール",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PointType::Start => "🟢",
            PointType::Waypoint => "🔴",
            PointType::Goal => "🔵",
        }
    }

    /// Label prefixed with the icon, e.g. "🔴 中継地点2".
    pub fn label_with_icon(self, waypoint_number: Option<usize>) -> String {
        match (self, waypoint_number) {
            (PointType::Waypoint, Some(n)) => format!("{} {}{}", self.icon(), self.label(), n),
            _ => format!("{} {}", self.icon(), self.label()),
        }
    }
}

/// A geographic point in a route.
///
/// Coordinates are degrees. `order` mirrors the point's position in its
/// sequence and is reassigned by [`crate::sequence::PointSequence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub order: usize,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "timestamp")]
    pub created_at: String,
    #[serde(default = "timestamp")]
    pub updated_at: String,
}

impl Point {
    pub fn new(lat: f64, lng: f64, point_type: PointType, order: usize) -> Self {
        let now = timestamp();
        Self {
            id: new_id(),
            lat,
            lng,
            point_type,
            order,
            comment: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    fn first_comment_line(&self) -> Option<String> {
        let line = self.comment.lines().next()?;
        if line.is_empty() {
            return None;
        }
        Some(line.chars().take(TITLE_LENGTH).collect())
    }

    /// Sidebar title: icon plus the start of the comment, or the role label.
    pub fn display_title(&self, waypoint_number: Option<usize>) -> String {
        match self.first_comment_line() {
            Some(line) => format!("{} {}", self.point_type.icon(), line),
            None => self.point_type.label_with_icon(waypoint_number),
        }
    }

    /// Marker title: start of the comment, or the plain role label.
    pub fn marker_title(&self) -> String {
        self.first_comment_line()
            .unwrap_or_else(|| self.point_type.label().to_string())
    }
}

/// Fields a caller may change on an existing point.
///
/// Role, order and identity are owned by the sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointPatch {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub comment: Option<String>,
}

impl PointPatch {
    pub fn location(lat: f64, lng: f64) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            comment: None,
        }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// True when applying the patch changes where the point is.
    pub fn moves_point(&self) -> bool {
        self.lat.is_some() || self.lng.is_some()
    }

    pub(crate) fn apply(&self, point: &mut Point) {
        if let Some(lat) = self.lat {
            point.lat = lat;
        }
        if let Some(lng) = self.lng {
            point.lng = lng;
        }
        if let Some(comment) = &self.comment {
            point.comment = clamp_comment(comment);
        }
        point.updated_at = timestamp();
    }
}

pub(crate) fn clamp_comment(comment: &str) -> String {
    comment.chars().take(MAX_COMMENT_LENGTH).collect()
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
