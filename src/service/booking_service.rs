// service/booking_service.rs
use std::sync::Arc;
use chrono::Utc;
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{bookingdb::BookingExt, providerdb::ProviderExt},
    dtos::bookingdtos::CreateBookingDto,
    models::bookingmodel::*,
    service::{error::ServiceError, payout},
};

#[derive(Debug)]
pub struct BookingService<S> {
    store: Arc<S>,
}

impl<S> Clone for BookingService<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<S> BookingService<S>
where
    S: BookingExt + ProviderExt + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_booking(
        &self,
        client_id: Uuid,
        body: CreateBookingDto,
    ) -> Result<Booking, ServiceError> {
        body.validate()?;

        let provider = self.store
            .get_provider_by_id(body.provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(body.provider_id))?;

        if !provider.is_verified {
            tracing::warn!("Booking rejected: provider {} is not verified", provider.id);
            return Err(ServiceError::ProviderNotEligible(provider.id));
        }

        let booking = self.store
            .create_booking(client_id, provider.id, body.description)
            .await?;

        tracing::info!(
            "Booking {} created: client={} provider={}",
            booking.id,
            client_id,
            provider.id
        );
        Ok(booking)
    }

    /// Provider prices a pending booking. The split is computed here and
    /// written together with the amount in one conditional update.
    pub async fn quote(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
    ) -> Result<Booking, ServiceError> {
        let booking = self.get_booking(booking_id).await?;
        ensure_owner(&booking, provider_id)?;

        let split = payout::split(&amount)?;

        if booking.status != BookingStatus::Pending {
            tracing::warn!("Quote rejected: booking {} is {}", booking_id, booking.status.to_str());
            return Err(ServiceError::InvalidBookingStatus(booking_id, booking.status));
        }

        match self.store.apply_quote(booking_id, provider_id, &split).await? {
            Some(quoted) => {
                tracing::info!(
                    "Booking {} quoted at {} (provider {}, platform {})",
                    booking_id,
                    split.amount(),
                    split.provider_cut(),
                    split.platform_fee()
                );
                Ok(quoted)
            }
            // Someone else moved it on between the read and the update
            None => Err(self.current_status_error(booking_id).await),
        }
    }

    /// Completing an already-completed booking returns it unchanged.
    pub async fn complete(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self.get_booking(booking_id).await?;
        ensure_owner(&booking, provider_id)?;

        match booking.status {
            BookingStatus::Completed => {
                tracing::debug!("Booking {} already completed", booking_id);
                return Ok(booking);
            }
            BookingStatus::Pending => {
                tracing::warn!("Completion rejected: booking {} has not been quoted", booking_id);
                return Err(ServiceError::InvalidBookingStatus(booking_id, booking.status));
            }
            BookingStatus::Quoted => {}
        }

        match self.store.mark_booking_completed(booking_id, provider_id).await? {
            Some(completed) => {
                tracing::info!("Booking {} completed by provider {}", booking_id, provider_id);
                Ok(completed)
            }
            None => {
                // A concurrent completion won the race
                let current = self.get_booking(booking_id).await?;
                if current.status == BookingStatus::Completed {
                    Ok(current)
                } else {
                    Err(ServiceError::InvalidBookingStatus(booking_id, current.status))
                }
            }
        }
    }

    /// Batch payout stamp. Bookings that are not completed, already paid or
    /// unknown are skipped; the return value counts only newly paid ones.
    pub async fn mark_paid(
        &self,
        booking_ids: &[Uuid],
        admin_id: Uuid,
    ) -> Result<u64, ServiceError> {
        let mut ids = booking_ids.to_vec();
        ids.sort();
        ids.dedup();

        let stamped = self.store.mark_bookings_paid(&ids, Utc::now()).await?;

        tracing::info!(
            "Admin {} marked {} of {} bookings as paid",
            admin_id,
            stamped,
            ids.len()
        );
        Ok(stamped)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.store
            .get_booking_by_id(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))
    }

    pub async fn bookings_for_client(&self, client_id: Uuid) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.store.get_client_bookings(client_id).await?)
    }

    pub async fn bookings_for_provider(&self, provider_id: Uuid) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.store.get_provider_bookings(provider_id).await?)
    }

    pub async fn provider_earnings(&self, provider_id: Uuid) -> Result<ProviderEarnings, ServiceError> {
        self.store
            .get_provider_by_id(provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;

        Ok(self.store.get_provider_earnings(provider_id).await?)
    }

    async fn current_status_error(&self, booking_id: Uuid) -> ServiceError {
        match self.get_booking(booking_id).await {
            Ok(current) => ServiceError::InvalidBookingStatus(booking_id, current.status),
            Err(err) => err,
        }
    }
}

fn ensure_owner(booking: &Booking, provider_id: Uuid) -> Result<(), ServiceError> {
    if booking.provider_id != provider_id {
        tracing::warn!(
            "Provider {} attempted to act on booking {} owned by {}",
            provider_id,
            booking.id,
            booking.provider_id
        );
        return Err(ServiceError::UnauthorizedBookingAccess(provider_id, booking.id));
    }
    Ok(())
}
