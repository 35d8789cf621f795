//! Reservation DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::Reservation;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub concert_id: i32,
    pub email: String,
    pub quantity: i32,
    /// `CONFIRMED` or `CANCELLED`
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            concert_id: r.concert_id,
            email: r.email,
            quantity: r.quantity,
            status: r.status.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}

/// Email and quantity are checked by the booking core, which reports them
/// as 400 validation errors like every other admission refusal.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    pub concert_id: i32,
    pub email: String,
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReservationQuery {
    /// Only this holder's reservations (case-insensitive)
    pub email: Option<String>,
}
