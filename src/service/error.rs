use thiserror::Error;
use uuid::Uuid;
use crate::{
    models::bookingmodel::BookingStatus,
    error::{ErrorKind, ErrorResponse},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Rating must be between 1 and 5 stars, got {0}")]
    InvalidRating(i32),

    #[error("User {0} is not authorized to perform this action on booking {1}")]
    UnauthorizedBookingAccess(Uuid, Uuid),

    #[error("User {0} is not authorized to manage provider {1}")]
    UnauthorizedProviderAccess(Uuid, Uuid),

    #[error("Provider {0} is not verified and cannot receive bookings")]
    ProviderNotEligible(Uuid),

    #[error("Booking {0} is in status {1:?}")]
    InvalidBookingStatus(Uuid, BookingStatus),

    #[error("Provider {0} not found")]
    ProviderNotFound(Uuid),

    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidCoordinate(_) => ErrorKind::InvalidCoordinate,

            ServiceError::InvalidAmount(_) => ErrorKind::InvalidAmount,

            ServiceError::InvalidRating(_) => ErrorKind::InvalidRating,

            ServiceError::UnauthorizedBookingAccess(_, _)
            | ServiceError::UnauthorizedProviderAccess(_, _) => ErrorKind::Unauthorized,

            ServiceError::ProviderNotEligible(_) => ErrorKind::ProviderNotEligible,

            ServiceError::InvalidBookingStatus(_, _) => ErrorKind::InvalidState,

            ServiceError::ProviderNotFound(_)
            | ServiceError::BookingNotFound(_) => ErrorKind::NotFound,

            ServiceError::Validation(_) => ErrorKind::Validation,

            ServiceError::Database(_)
            | ServiceError::Migration(_) => ErrorKind::Internal,
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(error: ServiceError) -> Self {
        // Store failures are logged in full, callers only get the kind
        let message = match &error {
            ServiceError::Database(_) | ServiceError::Migration(_) => {
                tracing::error!("Store failure: {}", error);
                "Internal storage error".to_string()
            }
            _ => error.to_string(),
        };
        ErrorResponse::new(error.kind(), message)
    }
}
