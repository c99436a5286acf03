pub mod booking_service;
pub mod error;
pub mod geo;
pub mod payout;
pub mod provider_service;
pub mod rating_service;
