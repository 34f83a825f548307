//! Polyline representation and codec for route geometries.
//!
//! Routing services return each leg's shape as a delta-encoded ASCII string
//! at a fixed decimal precision (Valhalla uses six digits). Decoding
//! happens at the boundary; the rest of the crate works with coordinates.

use serde::{Deserialize, Serialize};

use crate::error::PolylineError;

/// Precision used by Valhalla shapes (six decimal digits).
pub const PRECISION_6: f64 = 1e6;

/// Precision used by the classic five-digit format.
pub const PRECISION_5: f64 = 1e5;

/// A polyline representing a route geometry as decoded coordinates.
///
/// Stores (latitude, longitude) points, the order used for rendering and
/// for saved routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from (latitude, longitude) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Builds a polyline from (longitude, latitude) pairs as produced by
    /// [`decode`], swapping each pair into rendering order.
    pub fn from_lng_lat(coordinates: &[(f64, f64)]) -> Self {
        Self {
            points: coordinates.iter().map(|&(lng, lat)| (lat, lng)).collect(),
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Decode an encoded polyline into (longitude, latitude) pairs.
///
/// Each coordinate is a latitude delta followed by a longitude delta. A
/// delta is a run of 6-bit groups (byte minus 63), low five bits first,
/// continuing while bit 0x20 is set, then zig-zag decoded.
pub fn decode(encoded: &str, precision: f64) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut coordinates = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat = accumulate(lat, bytes, &mut index)?;
        lng = accumulate(lng, bytes, &mut index)?;
        coordinates.push((lng as f64 / precision, lat as f64 / precision));
    }

    Ok(coordinates)
}

/// Decode every leg and concatenate the results in leg order.
///
/// The joint coordinate shared by consecutive legs is kept twice.
pub fn decode_legs<'a, I>(shapes: I, precision: f64) -> Result<Vec<(f64, f64)>, PolylineError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut coordinates = Vec::new();
    for shape in shapes {
        coordinates.extend(decode(shape, precision)?);
    }
    Ok(coordinates)
}

fn accumulate(value: i64, bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    value
        .checked_add(next_delta(bytes, index)?)
        .ok_or(PolylineError::Overflow { index: start })
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or(PolylineError::Truncated { index: *index })?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { index: *index, byte });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow { index: *index });
        }
        *index += 1;

        let chunk = u64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    let value = (result >> 1) as i64;
    Ok(if result & 1 == 1 { !value } else { value })
}

/// Encode (latitude, longitude) points. Inverse of [`decode`] up to
/// rounding at `precision`.
pub fn encode(points: &[(f64, f64)], precision: f64) -> String {
    let mut encoded = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for &(lat, lng) in points {
        let lat = (lat * precision).round() as i64;
        let lng = (lng * precision).round() as i64;
        push_delta(&mut encoded, lat - prev_lat);
        push_delta(&mut encoded, lng - prev_lng);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn push_delta(out: &mut String, delta: i64) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = zigzag as u64;
    while value >= 0x20 {
        out.push(char::from((0x20 | (value & 0x1f)) as u8 + 63));
        value >>= 5;
    }
    out.push(char::from(value as u8 + 63));
}
