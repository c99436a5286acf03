use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBookingDto {
    pub provider_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,
}
