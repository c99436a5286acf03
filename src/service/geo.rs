// service/geo.rs
use serde::{Deserialize, Serialize};

use crate::service::error::ServiceError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ServiceError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ServiceError::InvalidCoordinate(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ServiceError::InvalidCoordinate(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }
        Ok(Coordinate { latitude, longitude })
    }

    /// Builds a coordinate from request parameters that may be absent.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self, ServiceError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => Err(ServiceError::InvalidCoordinate(
                "both latitude and longitude are required".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        Self::new(self.latitude, self.longitude).map(|_| ())
    }
}

/// Great-circle distance in kilometres using the haversine formula.
pub fn distance(a: Coordinate, b: Coordinate) -> Result<f64, ServiceError> {
    a.validate()?;
    b.validate()?;
    Ok(haversine_km(a, b))
}

pub(crate) fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();
    c * EARTH_RADIUS_KM
}

pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// True when `km` is already a whole number of hundredths, the precision
/// distances are reported at.
pub fn is_reported_precision(km: f64) -> bool {
    km.is_finite() && round_km(km) == km
}
