pub mod bookingdb;
pub mod db;
pub mod memory;
pub mod providerdb;
pub mod ratingdb;

use bookingdb::BookingExt;
use providerdb::ProviderExt;
use ratingdb::RatingExt;

/// Everything the services need from a record store.
pub trait Store: ProviderExt + BookingExt + RatingExt + Send + Sync + 'static {}

impl<T> Store for T where T: ProviderExt + BookingExt + RatingExt + Send + Sync + 'static {}
