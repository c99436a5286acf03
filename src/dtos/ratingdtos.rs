use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitRatingDto {
    pub provider_id: Uuid,

    pub stars: i32,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}
