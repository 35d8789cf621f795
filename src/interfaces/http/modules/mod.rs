pub mod artists;
pub mod auth;
pub mod concerts;
pub mod health;
pub mod metrics;
pub mod parameters;
pub mod reports;
pub mod request_id;
pub mod reservations;
pub mod stages;
