pub mod bookingdtos;
pub mod providerdtos;
pub mod ratingdtos;
