//! Great-circle distance math.
//!
//! Pure functions over decimal-degree coordinates. Range validation is the
//! caller's responsibility: the catalog loader and the HTTP surface reject
//! out-of-range coordinates before they reach this module, so everything
//! here is a total function — non-finite inputs propagate as NaN rather
//! than erroring.

use flashrv_core::Coordinate;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points via the haversine formula.
///
/// Symmetric, and exactly zero for coincident points.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `b` lies within `radius_km` of `a`.
///
/// A negative radius never matches, coincident points included.
#[must_use]
pub fn within(a: Coordinate, b: Coordinate, radius_km: f64) -> bool {
    radius_km >= 0.0 && distance_km(a, b) <= radius_km
}

/// Round a distance to two decimals for presentation.
#[must_use]
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
