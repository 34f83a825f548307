//! Real locations around central Tokyo, as (latitude, longitude).

pub const TOKYO_STATION: (f64, f64) = (35.681236, 139.767125);
pub const IMPERIAL_PALACE: (f64, f64) = (35.685175, 139.752799);
pub const HIBIYA_PARK: (f64, f64) = (35.673758, 139.755917);
pub const GINZA_CROSSING: (f64, f64) = (35.671989, 139.765023);
pub const TOKYO_TOWER: (f64, f64) = (35.658581, 139.745433);

/// A walk from Tokyo Station to Tokyo Tower, in insertion order.
pub fn walk() -> Vec<(f64, f64)> {
    vec![TOKYO_STATION, TOKYO_TOWER, IMPERIAL_PALACE, HIBIYA_PARK, GINZA_CROSSING]
}
