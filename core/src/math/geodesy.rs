use crate::acmi::{Acmi, PositionRecord};
use std::str::FromStr;

/// semi major axis in meters
pub const EQUATORIAL_EARTH_RADIUS: f64 = 6378137.0;

/// semi minor axis in meters
pub const POLAR_EARTH_RADIUS: f64 = 6356752.3;

/// first eccentricity squared
pub const E_EARTH_SQUARED: f64 = 0.00669437999014;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    StatuteMiles,
    NauticalMiles,
}

impl DistanceUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::StatuteMiles => 1609.0,
            DistanceUnit::NauticalMiles => 1852.0,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = std::convert::Infallible;

    /// Unrecognized unit names fall back to meters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "km" => DistanceUnit::Kilometers,
            "mi" => DistanceUnit::StatuteMiles,
            "nm" => DistanceUnit::NauticalMiles,
            _ => DistanceUnit::Meters,
        })
    }
}

/// Earth-centered, earth-fixed point in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Converts a geodetic position (degrees, meters above the ellipsoid).
    pub fn from_geodetic(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        let lat = latitude_deg.to_radians();
        let lon = longitude_deg.to_radians();
        let radius = earth_radius(lat);
        let clat = geocentric_latitude(lat);

        let (sin_lon, cos_lon) = lon.sin_cos();
        let (sin_clat, cos_clat) = clat.sin_cos();
        let surface = Cartesian3::new(
            radius * cos_lon * cos_clat,
            radius * sin_lon * cos_clat,
            radius * sin_clat,
        );

        // unit normal at the geodetic latitude
        let (sin_glat, cos_glat) = lat.sin_cos();
        let normal = Cartesian3::new(cos_glat * cos_lon, cos_glat * sin_lon, sin_glat);

        Cartesian3::new(
            surface.x + altitude_m * normal.x,
            surface.y + altitude_m * normal.y,
            surface.z + altitude_m * normal.z,
        )
    }

    pub fn distance(&self, other: &Cartesian3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Ellipsoid radius in meters at the given latitude (radians).
fn earth_radius(latitude: f64) -> f64 {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let a = EQUATORIAL_EARTH_RADIUS;
    let b = POLAR_EARTH_RADIUS;
    let t1 = a * a * cos_lat;
    let t2 = b * b * sin_lat;
    let t3 = a * cos_lat;
    let t4 = b * sin_lat;
    ((t1 * t1 + t2 * t2) / (t3 * t3 + t4 * t4)).sqrt()
}

fn geocentric_latitude(latitude: f64) -> f64 {
    ((1.0 - E_EARTH_SQUARED) * latitude.tan()).atan()
}

/// Absolute ECEF point of an object position, offset by the mission reference point.
pub fn position_to_point(acmi: &Acmi, position: &PositionRecord) -> Cartesian3 {
    let reference_lat = acmi.properties.reference_latitude.unwrap_or(0.0);
    let reference_lon = acmi.properties.reference_longitude.unwrap_or(0.0);
    Cartesian3::from_geodetic(
        reference_lat + position.latitude.unwrap_or(0.0),
        reference_lon + position.longitude.unwrap_or(0.0),
        position.altitude.unwrap_or(0.0),
    )
}

/// Straight-line distance between two object positions.
pub fn distance(acmi: &Acmi, from: &PositionRecord, to: &PositionRecord, unit: DistanceUnit) -> f64 {
    let meters = position_to_point(acmi, from).distance(&position_to_point(acmi, to));
    meters / unit.meters_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(lon: f64, lat: f64, alt: f64) -> PositionRecord {
        PositionRecord {
            longitude: Some(lon),
            latitude: Some(lat),
            altitude: Some(alt),
            ..Default::default()
        }
    }

    fn session(reference_lon: f64, reference_lat: f64) -> Acmi {
        let mut acmi = Acmi::new();
        acmi.properties.reference_longitude = Some(reference_lon);
        acmi.properties.reference_latitude = Some(reference_lat);
        acmi
    }

    #[test]
    fn one_degree_along_the_equator() {
        let acmi = session(0.0, 0.0);
        let meters = distance(
            &acmi,
            &position(0.0, 0.0, 0.0),
            &position(1.0, 0.0, 0.0),
            DistanceUnit::Meters,
        );
        assert!((meters - 111_318.078).abs() < 0.01, "got {}", meters);
    }

    #[test]
    fn distance_is_symmetric() {
        let acmi = session(41.0, 42.0);
        let a = position(0.2513, 0.8812, 7600.0);
        let b = position(-0.1174, 0.4031, 120.0);
        let ab = distance(&acmi, &a, &b, DistanceUnit::Kilometers);
        let ba = distance(&acmi, &b, &a, DistanceUnit::Kilometers);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 0.0);
    }

    #[test]
    fn identical_positions_are_zero_apart() {
        let acmi = session(35.0, 33.0);
        let a = position(0.5, 0.5, 500.0);
        assert_eq!(distance(&acmi, &a, &a, DistanceUnit::NauticalMiles), 0.0);
    }

    #[test]
    fn altitude_is_added_along_the_normal() {
        let acmi = session(12.0, 47.0);
        let low = position(0.1, 0.1, 0.0);
        let high = position(0.1, 0.1, 1000.0);
        let meters = distance(&acmi, &low, &high, DistanceUnit::Meters);
        assert!((meters - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn units_scale_the_metric_distance() {
        let acmi = session(0.0, 0.0);
        let a = position(0.0, 0.0, 0.0);
        let b = position(0.0, 0.0, 3704.0);
        assert!((distance(&acmi, &a, &b, DistanceUnit::NauticalMiles) - 2.0).abs() < 1e-9);
        assert!((distance(&acmi, &a, &b, DistanceUnit::Kilometers) - 3.704).abs() < 1e-9);
        assert!((distance(&acmi, &a, &b, DistanceUnit::StatuteMiles) - 3704.0 / 1609.0).abs() < 1e-9);
    }

    #[test]
    fn unit_names_parse_case_insensitively() {
        assert_eq!("KM".parse::<DistanceUnit>(), Ok(DistanceUnit::Kilometers));
        assert_eq!("nm".parse::<DistanceUnit>(), Ok(DistanceUnit::NauticalMiles));
        assert_eq!("Mi".parse::<DistanceUnit>(), Ok(DistanceUnit::StatuteMiles));
        assert_eq!("furlong".parse::<DistanceUnit>(), Ok(DistanceUnit::Meters));
    }
}
