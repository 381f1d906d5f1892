//! Customer-to-merchant distance on the WGS-84 ellipsoid

use crate::types::Coordinates;
use geographiclib_rs::{Geodesic, InverseGeodesic};

/// Geodesic surface distance between two points in kilometres.
///
/// Coordinates are not range checked. Latitudes beyond ±90° come back as NaN
/// or an extreme distance instead of an error.
pub fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let geodesic = Geodesic::wgs84();
    let metres: f64 = geodesic.inverse(from.latitude, from.longitude, to.latitude, to.longitude);
    metres / 1000.0
}
