use serde::{Deserialize, Serialize};
use std::fmt::Display;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on earth given in degrees.
///
/// The persisted representation is `"(lon,lat)"`, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    /// Returns `None` if any of the values is not finite or outside of the
    /// valid longitude / latitude ranges
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        Some(Self { lon, lat })
    }

    /// Parses `"(lon,lat)"` or `"lon, lat"`. Surrounding parentheses and
    /// whitespace are optional.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('(').unwrap_or(s);
        let s = s.strip_suffix(')').unwrap_or(s);

        let mut parts = s.split(',');
        let lon = parts.next()?.trim().parse::<f64>().ok()?;
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        if parts.next().is_some() {
            return None;
        }

        Self::new(lon, lat)
    }

    pub fn format_for_storage(&self) -> String {
        format!("({},{})", self.lon, self.lat)
    }

    /// Great-circle distance in kilometers using the Haversine formula,
    /// rounded to two decimals.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Clamp to guard against floating point drift for antipodal points
        let c = 2.0 * a.sqrt().min(1.0).asin();

        round_2(EARTH_RADIUS_KM * c)
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_for_storage())
    }
}

pub fn distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    a.distance_km(b)
}

fn round_2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}
