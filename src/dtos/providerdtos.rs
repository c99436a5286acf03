use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ratingmodel::RatingSummary;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterProviderDto {
    #[validate(length(min = 1, max = 150, message = "Display name must be between 1 and 150 characters"))]
    pub display_name: String,

    #[validate(length(min = 1, max = 100, message = "Service type must be between 1 and 100 characters"))]
    pub service_type: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    // checked as a pair when the profile is created
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderMatch {
    pub provider_id: Uuid,
    pub display_name: String,
    pub service_type: String,
    pub distance_km: f64,
    pub rating: RatingSummary,
}
