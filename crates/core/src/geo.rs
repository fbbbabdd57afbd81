//! Geographic points and great-circle distance.
//!
//! Distances are computed with the haversine formula on a spherical Earth of
//! radius [`EARTH_RADIUS_KM`], so every distance is in kilometres.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`GeoPoint::haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the sphere, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    /// Latitude in radians, positive north.
    pub lat: f64,
    /// Longitude in radians, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from radians without validation.
    pub const fn from_radians(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point from decimal degrees.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn from_degrees(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidCoordinate { value: lat });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidCoordinate { value: lon });
        }
        Ok(Self::from_radians(lat.to_radians(), lon.to_radians()))
    }

    /// Latitude in degrees.
    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Longitude in degrees.
    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let dlat = other.lat - self.lat;
        let dlon = other.lon - self.lon;

        let a = (dlat / 2.0).sin().powi(2)
            + self.lat.cos() * other.lat.cos() * (dlon / 2.0).sin().powi(2);
        // Rounding can push `a` marginally above 1 for antipodal points.
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_to_self() {
        let p = GeoPoint::from_degrees(-15.7939, -47.8828).unwrap();
        assert_eq!(p.haversine_km(&p), 0.0);
    }

    #[test]
    fn test_quarter_meridian() {
        let equator = GeoPoint::from_degrees(0.0, 0.0).unwrap();
        let pole = GeoPoint::from_degrees(90.0, 0.0).unwrap();
        let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM;
        assert_relative_eq!(equator.haversine_km(&pole), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_antipodal_points() {
        let a = GeoPoint::from_degrees(0.0, 0.0).unwrap();
        let b = GeoPoint::from_degrees(0.0, 180.0).unwrap();
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert_relative_eq!(a.haversine_km(&b), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_known_capital_distance() {
        // Washington, D.C. to Ottawa is roughly 735 km.
        let washington = GeoPoint::from_degrees(38.9072, -77.0369).unwrap();
        let ottawa = GeoPoint::from_degrees(45.4215, -75.6972).unwrap();
        let d = washington.haversine_km(&ottawa);
        assert!((d - 735.0).abs() < 10.0, "got {d}");
        assert_relative_eq!(d, ottawa.haversine_km(&washington), epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::from_degrees(91.0, 0.0),
            Err(Error::InvalidCoordinate { .. })
        ));
        assert!(GeoPoint::from_degrees(0.0, -180.5).is_err());
        assert!(GeoPoint::from_degrees(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_degrees_round_trip() {
        let p = GeoPoint::from_degrees(12.5, -70.25).unwrap();
        assert_relative_eq!(p.lat_degrees(), 12.5, epsilon = 1e-12);
        assert_relative_eq!(p.lon_degrees(), -70.25, epsilon = 1e-12);
    }
}
