// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Radius of Earth used for all distance computations, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in miles.
///
/// The function is symmetric in its two positions.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let sin_dphi_half = ((lat2 - lat1).to_radians() * 0.5).sin();
    let sin_dlambda_half = ((lon2 - lon1).to_radians() * 0.5).sin();

    // Rounding can push `a` slightly past 1 for antipodal positions
    let a = (sin_dphi_half * sin_dphi_half
        + phi1.cos() * phi2.cos() * sin_dlambda_half * sin_dlambda_half)
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Calculates the initial bearing, in degrees, of the great-circle arc going
/// from the first to the second position. 0° points north, 90° east,
/// and the result is always within (-180°, 180°].
///
/// See <https://www.movable-type.co.uk/scripts/latlong.html>.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    y.atan2(x).to_degrees()
}

/// Distance from a position to the meridian (the pole-to-pole half of a great circle)
/// at `meridian_lon`, in miles.
pub(crate) fn meridian_distance(lat: f64, lon: f64, meridian_lon: f64) -> f64 {
    let dlambda = (lon - meridian_lon + 180.0).rem_euclid(360.0) - 180.0;
    if dlambda.abs() <= 90.0 {
        // Cross-track distance
        let x = lat.to_radians().cos() * dlambda.to_radians().sin().abs();
        EARTH_RADIUS_MILES * x.min(1.0).asin()
    } else {
        // Closest point of the meridian is the nearer pole
        EARTH_RADIUS_MILES * (90.0 - lat.abs()).to_radians()
    }
}

/// Distance from a position to the parallel at `parallel_lat`, in miles.
pub(crate) fn parallel_distance(lat: f64, parallel_lat: f64) -> f64 {
    EARTH_RADIUS_MILES * (lat - parallel_lat).to_radians().abs()
}
