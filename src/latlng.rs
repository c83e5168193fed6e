use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Largest per-axis difference for which two coordinates are considered equal.
pub const EPSILON: f64 = 0.0001;

/// A location on the Earth, in decimal degrees.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct LatLng {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl LatLng {
    /// Constructs a coordinate from a latitude and longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components differ from `other` by less than
    /// [`EPSILON`]. Coordinates usually pass through decimal text, so exact
    /// comparison is rarely what you want.
    pub fn almost_equal(&self, other: &LatLng) -> bool {
        (self.lat - other.lat).abs() < EPSILON && (self.lng - other.lng).abs() < EPSILON
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<LatLng, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let lat = parts.next().map(str::trim);
        let lng = parts.next().map(str::trim);
        match (lat, lng) {
            (Some(lat), Some(lng)) => Ok(LatLng {
                lat: lat.parse().map_err(|_| ParseError::Coordinate(s.into()))?,
                lng: lng.parse().map_err(|_| ParseError::Coordinate(s.into()))?,
            }),
            _ => Err(ParseError::Coordinate(s.into())),
        }
    }
}
