use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::types::BigDecimal;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Quoted,
    Completed,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Quoted => "quoted",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub description: String,
    pub amount: Option<BigDecimal>,         // unset while pending
    pub provider_cut: Option<BigDecimal>,   // derived from amount
    pub platform_fee: Option<BigDecimal>,   // derived from amount
    pub status: BookingStatus,
    pub is_paid_to_provider: bool,
    pub payout_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct ProviderEarnings {
    pub completed_jobs: i64,
    pub total_earnings: BigDecimal,
    pub paid_out: BigDecimal,
    pub outstanding: BigDecimal,
}
