use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::geo::Coordinate;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct ProviderProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub display_name: String,
    pub service_type: String,          // free text, e.g. "Plumbing"
    pub is_verified: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProviderProfile {
    /// Both halves of the location are written together, so a half-set pair
    /// is treated as no location at all.
    pub fn location(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate { latitude, longitude }),
            _ => None,
        }
    }

    /// Eligible for proximity matching and for receiving bookings.
    pub fn is_matchable(&self) -> bool {
        self.is_verified && self.location().is_some()
    }
}
