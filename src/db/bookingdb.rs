// db/bookingdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use sqlx::Error;

use super::db::DBClient;
use crate::{
    models::bookingmodel::*,
    service::payout::Payout,
};

#[async_trait]
pub trait BookingExt {
    async fn create_booking(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        description: String,
    ) -> Result<Booking, Error>;

    async fn get_booking_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, Error>;

    // Conditional on the booking still being pending and owned by the provider.
    // Returns None when the guard did not hold.
    async fn apply_quote(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        payout: &Payout,
    ) -> Result<Option<Booking>, Error>;

    // Conditional on the booking being quoted and owned by the provider.
    async fn mark_booking_completed(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Booking>, Error>;

    /// Stamps every completed, unpaid booking in `booking_ids` and returns how
    /// many were stamped.
    async fn mark_bookings_paid(
        &self,
        booking_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> Result<u64, Error>;

    async fn get_client_bookings(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<Booking>, Error>;

    async fn get_provider_bookings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Booking>, Error>;

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn create_booking(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        description: String,
    ) -> Result<Booking, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (client_id, provider_id, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            "#
        )
        .bind(client_id)
        .bind(provider_id)
        .bind(description)
        .bind(BookingStatus::Pending)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_booking_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            FROM bookings
            WHERE id = $1
            "#
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn apply_quote(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        payout: &Payout,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET amount = $3,
                provider_cut = $4,
                platform_fee = $5,
                status = 'quoted'::booking_status
            WHERE id = $1
              AND provider_id = $2
              AND status = 'pending'::booking_status
            RETURNING
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            "#
        )
        .bind(booking_id)
        .bind(provider_id)
        .bind(payout.amount())
        .bind(payout.provider_cut())
        .bind(payout.platform_fee())
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_booking_completed(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'completed'::booking_status
            WHERE id = $1
              AND provider_id = $2
              AND status = 'quoted'::booking_status
            RETURNING
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            "#
        )
        .bind(booking_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_bookings_paid(
        &self,
        booking_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> Result<u64, Error> {
        if booking_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET is_paid_to_provider = TRUE,
                payout_date = $2
            WHERE id = ANY($1)
              AND status = 'completed'::booking_status
              AND is_paid_to_provider = FALSE
            "#
        )
        .bind(booking_ids)
        .bind(paid_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_client_bookings(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            FROM bookings
            WHERE client_id = $1
            ORDER BY created_at DESC, id
            "#
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_provider_bookings(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<Booking>, Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, client_id, provider_id, description,
                amount, provider_cut, platform_fee,
                status, is_paid_to_provider, payout_date, created_at
            FROM bookings
            WHERE provider_id = $1
            ORDER BY created_at DESC, id
            "#
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_provider_earnings(
        &self,
        provider_id: Uuid,
    ) -> Result<ProviderEarnings, Error> {
        sqlx::query_as::<_, ProviderEarnings>(
            r#"
            SELECT
                COUNT(*) AS completed_jobs,
                COALESCE(SUM(provider_cut), 0)::NUMERIC(12, 2) AS total_earnings,
                COALESCE(SUM(provider_cut) FILTER (WHERE is_paid_to_provider), 0)::NUMERIC(12, 2) AS paid_out,
                COALESCE(SUM(provider_cut) FILTER (WHERE NOT is_paid_to_provider), 0)::NUMERIC(12, 2) AS outstanding
            FROM bookings
            WHERE provider_id = $1
              AND status = 'completed'::booking_status
            "#
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
    }
}
