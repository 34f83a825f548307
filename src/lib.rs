//! walk-planner core
//!
//! Walking-route editing, path synthesis through a routing service, and a
//! saved-route archive with JSON export and validated import.

pub mod traits;
pub mod error;
pub mod point;
pub mod sequence;
pub mod polyline;
pub mod valhalla;
pub mod synthesizer;
pub mod validate;
pub mod archive;
pub mod storage;
pub mod geocoding;
