use crate::prelude::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude of the default point of interest (Lima).
pub const DEFAULT_LATITUDE: f64 = -12.04374415711892;
/// Longitude of the default point of interest (Lima).
pub const DEFAULT_LONGITUDE: f64 = -77.04273545646473;

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> DashboardResult<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(DashboardError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DashboardError;

    fn try_from(raw: RawCoordinate) -> DashboardResult<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range_values() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.01).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn coordinate_display_uses_hemispheres() {
        let coord = Coordinate::default();
        assert_eq!(coord.to_string(), "12.0437°S, 77.0427°W");

        let north_east = Coordinate::new(48.8566, 2.3522).unwrap();
        assert_eq!(north_east.to_string(), "48.8566°N, 2.3522°E");
    }

    #[test]
    fn coordinate_deserialization_validates_bounds() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude": -12.5, "longitude": -77.0}"#).unwrap();
        assert_eq!(ok.latitude(), -12.5);

        let err = serde_json::from_str::<Coordinate>(r#"{"latitude": 120.0, "longitude": 0.0}"#);
        assert!(err.is_err());
    }
}
