pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod models;
pub mod service;

use std::sync::Arc;

use sqlx::types::BigDecimal;
use tracing_subscriber::filter::LevelFilter;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, Store},
    dtos::{bookingdtos::CreateBookingDto, providerdtos::*, ratingdtos::SubmitRatingDto},
    error::ErrorResponse,
    models::{bookingmodel::*, providermodel::ProviderProfile, ratingmodel::*},
    service::{
        booking_service::BookingService,
        geo::Coordinate,
        provider_service::ProviderService,
        rating_service::RatingService,
    },
};

/// Installs the fmt subscriber at the configured level.
pub fn init_tracing(config: &Config) {
    let level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::DEBUG);

    // A subscriber may already be installed by the embedding application
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init();
}

/// Wires the provider, booking and rating services over one store and exposes
/// the operations the request-handling layer calls. Failures leave here as
/// [`ErrorResponse`]s.
#[derive(Debug)]
pub struct ServiceHub<S> {
    pub provider_service: Arc<ProviderService<S>>,
    pub booking_service: Arc<BookingService<S>>,
    pub rating_service: Arc<RatingService<S>>,
}

impl<S> Clone for ServiceHub<S> {
    fn clone(&self) -> Self {
        Self {
            provider_service: self.provider_service.clone(),
            booking_service: self.booking_service.clone(),
            rating_service: self.rating_service.clone(),
        }
    }
}

impl ServiceHub<DBClient> {
    pub async fn connect(config: &Config) -> Result<Self, ErrorResponse> {
        let db_client = DBClient::connect(config).await?;
        Ok(Self::new(Arc::new(db_client), config.nearby_radius_km))
    }
}

impl<S: Store> ServiceHub<S> {
    pub fn new(store: Arc<S>, nearby_radius_km: f64) -> Self {
        let rating_service = Arc::new(RatingService::new(store.clone()));
        let provider_service = Arc::new(ProviderService::new(
            store.clone(),
            rating_service.clone(),
            nearby_radius_km,
        ));
        let booking_service = Arc::new(BookingService::new(store));

        Self {
            provider_service,
            booking_service,
            rating_service,
        }
    }

    pub async fn find_nearby_providers(
        &self,
        origin_lat: Option<f64>,
        origin_lon: Option<f64>,
        radius_km: Option<f64>,
    ) -> Result<Vec<ProviderMatch>, ErrorResponse> {
        let origin = Coordinate::from_parts(origin_lat, origin_lon)?;
        Ok(self.provider_service.find_nearby(origin, radius_km).await?)
    }

    pub async fn register_provider(
        &self,
        account_id: Uuid,
        body: RegisterProviderDto,
    ) -> Result<ProviderProfile, ErrorResponse> {
        Ok(self.provider_service.register_provider(account_id, body).await?)
    }

    pub async fn verify_provider(
        &self,
        provider_id: Uuid,
        admin_id: Uuid,
    ) -> Result<ProviderProfile, ErrorResponse> {
        Ok(self.provider_service.verify_provider(provider_id, admin_id).await?)
    }

    pub async fn update_provider_location(
        &self,
        provider_id: Uuid,
        acting_account_id: Uuid,
        lat: f64,
        lon: f64,
    ) -> Result<ProviderProfile, ErrorResponse> {
        let location = Coordinate::new(lat, lon)?;
        let profile = self
            .provider_service
            .update_location(provider_id, acting_account_id, location)
            .await?;
        Ok(profile)
    }

    pub async fn create_booking(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        description: String,
    ) -> Result<Booking, ErrorResponse> {
        let body = CreateBookingDto { provider_id, description };
        Ok(self.booking_service.create_booking(client_id, body).await?)
    }

    pub async fn send_quote(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        amount: BigDecimal,
    ) -> Result<Booking, ErrorResponse> {
        Ok(self.booking_service.quote(booking_id, provider_id, amount).await?)
    }

    pub async fn complete_job(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Booking, ErrorResponse> {
        Ok(self.booking_service.complete(booking_id, provider_id).await?)
    }

    pub async fn mark_bookings_paid(
        &self,
        booking_ids: &[Uuid],
        admin_id: Uuid,
    ) -> Result<u64, ErrorResponse> {
        Ok(self.booking_service.mark_paid(booking_ids, admin_id).await?)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, ErrorResponse> {
        Ok(self.booking_service.get_booking(booking_id).await?)
    }

    pub async fn list_bookings_for_client(&self, client_id: Uuid) -> Result<Vec<Booking>, ErrorResponse> {
        Ok(self.booking_service.bookings_for_client(client_id).await?)
    }

    pub async fn list_bookings_for_provider(&self, provider_id: Uuid) -> Result<Vec<Booking>, ErrorResponse> {
        Ok(self.booking_service.bookings_for_provider(provider_id).await?)
    }

    pub async fn provider_earnings(&self, provider_id: Uuid) -> Result<ProviderEarnings, ErrorResponse> {
        Ok(self.booking_service.provider_earnings(provider_id).await?)
    }

    pub async fn submit_rating(
        &self,
        client_id: Uuid,
        provider_id: Uuid,
        stars: i32,
        comment: Option<String>,
    ) -> Result<Rating, ErrorResponse> {
        let body = SubmitRatingDto { provider_id, stars, comment };
        Ok(self.rating_service.rate(client_id, body).await?)
    }

    pub async fn get_provider_summary(&self, provider_id: Uuid) -> Result<RatingSummary, ErrorResponse> {
        Ok(self.rating_service.summary_for(provider_id).await?)
    }

    pub async fn list_ratings_for_provider(&self, provider_id: Uuid) -> Result<Vec<Rating>, ErrorResponse> {
        Ok(self.rating_service.ratings_for(provider_id).await?)
    }
}
