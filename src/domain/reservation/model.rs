//! Reservation domain entity

use chrono::{DateTime, Utc};
use tracing::warn;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// Seats are held and count against the concert capacity
    Confirmed,
    /// Seats were released; the row is kept for history
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Unknown stored values are treated as cancelled so they never count
    /// against capacity.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            warn!(status = s, "Unknown reservation status, treating as cancelled");
            Self::Cancelled
        })
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seat reservation for a concert, identified by the requester's email
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub concert_id: i32,
    /// Trimmed, lowercased email
    pub email: String,
    /// Number of seats, always >= 1
    pub quantity: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_confirmed(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    pub fn cancel(&mut self) {
        self.status = ReservationStatus::Cancelled;
    }
}

/// Admission request that already passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub concert_id: i32,
    pub email: String,
    pub quantity: i32,
}

impl NewReservation {
    /// Build a confirmed reservation row with the given id.
    pub fn confirm(self, id: i32, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            concert_id: self.concert_id,
            email: self.email,
            quantity: self.quantity,
            status: ReservationStatus::Confirmed,
            created_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
