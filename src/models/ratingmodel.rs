use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub client_id: Uuid,
    pub stars: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,  // kept from the first submission
}

// Raw aggregate as read from the store, before rounding
#[derive(Debug, Clone, Copy, sqlx::FromRow, PartialEq)]
pub struct RatingAggregate {
    pub average: f64,
    pub review_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub average_stars: f64,
    pub review_count: i64,
}
