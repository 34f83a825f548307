//! Validation of untrusted route import payloads.
//!
//! Every violation is collected so the user sees all problems at once.
//! Messages are 1-indexed and name the route, point and field.

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::point::MAX_COMMENT_LENGTH;

pub const MAX_ROUTES: usize = 100;
pub const MAX_NAME_LENGTH: usize = 100;

// Bounding box of Japan (GSI extreme points).
pub const LAT_MIN: f64 = 20.4253;
pub const LAT_MAX: f64 = 45.5572;
pub const LNG_MIN: f64 = 122.9325;
pub const LNG_MAX: f64 = 153.9867;

const POINT_TYPES: [&str; 3] = ["start", "waypoint", "goal"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn is_valid_latitude(lat: f64) -> bool {
    (LAT_MIN..=LAT_MAX).contains(&lat)
}

pub fn is_valid_longitude(lng: f64) -> bool {
    (LNG_MIN..=LNG_MAX).contains(&lng)
}

fn lat_range_hint() -> String {
    format!("（{}〜{}の範囲で指定してください）", LAT_MIN, LAT_MAX)
}

fn lng_range_hint() -> String {
    format!("（{}〜{}の範囲で指定してください）", LNG_MIN, LNG_MAX)
}

/// Check a parsed import payload. Never fails; problems are reported in
/// the result.
pub fn validate_import(data: &Value) -> ValidationResult {
    let Some(routes) = data.as_array() else {
        return ValidationResult::from_errors(vec!["データが配列ではありません".to_string()]);
    };

    let mut errors = Vec::new();
    if routes.len() > MAX_ROUTES {
        errors.push(format!(
            "ルート数が上限の{}件を超えています（{}件）",
            MAX_ROUTES,
            routes.len()
        ));
    }

    let per_route: Vec<Vec<String>> = routes
        .par_iter()
        .enumerate()
        .map(|(index, route)| validate_route(route, index))
        .collect();
    errors.extend(per_route.into_iter().flatten());

    ValidationResult::from_errors(errors)
}

fn validate_route(route: &Value, index: usize) -> Vec<String> {
    let prefix = format!("ルート{}", index + 1);
    let Some(r) = route.as_object() else {
        return vec![format!("{}: オブジェクトではありません", prefix)];
    };

    let mut errors = Vec::new();
    require_string(r, "id", &prefix, &mut errors);

    match r.get("name").and_then(Value::as_str) {
        None => errors.push(format!("{}: nameが文字列ではありません", prefix)),
        Some(name) if name.chars().count() > MAX_NAME_LENGTH => errors.push(format!(
            "{}: nameが{}文字を超えています",
            prefix, MAX_NAME_LENGTH
        )),
        Some(_) => {}
    }

    require_string(r, "created_at", &prefix, &mut errors);
    require_string(r, "updated_at", &prefix, &mut errors);

    match r.get("routeLine").and_then(Value::as_array) {
        None => errors.push(format!("{}: routeLineが配列ではありません", prefix)),
        Some(line) => {
            for (i, coord) in line.iter().enumerate() {
                validate_coordinate(coord, i, &prefix, &mut errors);
            }
        }
    }

    match r.get("points").and_then(Value::as_array) {
        None => errors.push(format!("{}: pointsが配列ではありません", prefix)),
        Some(points) => {
            for (i, point) in points.iter().enumerate() {
                errors.extend(validate_point(point, index, i));
            }
        }
    }

    errors
}

fn validate_coordinate(coord: &Value, i: usize, prefix: &str, errors: &mut Vec<String>) {
    let pair = coord
        .as_array()
        .filter(|c| c.len() == 2)
        .and_then(|c| Some((c[0].as_f64()?, c[1].as_f64()?)));

    let Some((lat, lng)) = pair else {
        errors.push(format!(
            "{}: routeLine[{}]が[緯度, 経度]の形式ではありません",
            prefix, i
        ));
        return;
    };

    if !is_valid_latitude(lat) {
        errors.push(format!(
            "{}: routeLine[{}]の緯度が無効です{}",
            prefix,
            i,
            lat_range_hint()
        ));
    }
    if !is_valid_longitude(lng) {
        errors.push(format!(
            "{}: routeLine[{}]の経度が無効です{}",
            prefix,
            i,
            lng_range_hint()
        ));
    }
}

fn validate_point(point: &Value, route_index: usize, point_index: usize) -> Vec<String> {
    let prefix = format!("ルート{}のポイント{}", route_index + 1, point_index + 1);
    let Some(p) = point.as_object() else {
        return vec![format!("{}: オブジェクトではありません", prefix)];
    };

    let mut errors = Vec::new();
    require_string(p, "id", &prefix, &mut errors);

    if !p.get("lat").and_then(Value::as_f64).is_some_and(is_valid_latitude) {
        errors.push(format!("{}: 緯度が無効です{}", prefix, lat_range_hint()));
    }
    if !p.get("lng").and_then(Value::as_f64).is_some_and(is_valid_longitude) {
        errors.push(format!("{}: 経度が無効です{}", prefix, lng_range_hint()));
    }

    let type_ok = p
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| POINT_TYPES.contains(&t));
    if !type_ok {
        errors.push(format!(
            "{}: typeが無効です（start, waypoint, goalのいずれかを指定してください）",
            prefix
        ));
    }

    if !p.get("order").is_some_and(Value::is_number) {
        errors.push(format!("{}: orderが数値ではありません", prefix));
    }

    match p.get("comment").and_then(Value::as_str) {
        None => errors.push(format!("{}: commentが文字列ではありません", prefix)),
        Some(comment) if comment.chars().count() > MAX_COMMENT_LENGTH => errors.push(format!(
            "{}: commentが{}文字を超えています",
            prefix, MAX_COMMENT_LENGTH
        )),
        Some(_) => {}
    }

    errors
}

fn require_string(object: &Map<String, Value>, field: &str, prefix: &str, errors: &mut Vec<String>) {
    if !object.get(field).is_some_and(Value::is_string) {
        errors.push(format!("{}: {}が文字列ではありません", prefix, field));
    }
}
