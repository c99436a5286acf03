pub mod bookingmodel;
pub mod providermodel;
pub mod ratingmodel;
