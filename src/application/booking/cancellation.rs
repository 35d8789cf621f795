//! Cancellation policy
//!
//! A confirmed reservation may be cancelled until `deadline` hours before
//! its concert starts. The deadline comes from the `CANCEL_DEADLINE_HOURS`
//! parameter and falls back to the configured default when the parameter is
//! missing or unusable.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::ledger::CapacityLedger;
use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Reservation, ReservationStatus,
    CANCEL_DEADLINE_HOURS,
};

/// Cutoff distance before a concert start, in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancellationDeadline {
    hours: f64,
}

impl CancellationDeadline {
    pub const DEFAULT_HOURS: f64 = 24.0;

    /// Largest accepted deadline: one hundred years.
    pub const MAX_HOURS: f64 = 24.0 * 365.0 * 100.0;

    /// `None` for negative, non-finite or larger than [`Self::MAX_HOURS`].
    pub fn new(hours: f64) -> Option<Self> {
        (hours.is_finite() && (0.0..=Self::MAX_HOURS).contains(&hours)).then_some(Self { hours })
    }

    /// Parse a stored parameter value, using `fallback` when it is absent
    /// or does not hold a non-negative number.
    pub fn from_parameter(raw: Option<&str>, fallback: CancellationDeadline) -> Self {
        raw.and_then(|v| v.trim().parse::<f64>().ok())
            .and_then(Self::new)
            .unwrap_or(fallback)
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    /// Last instant at which cancelling is still allowed, `None` when it
    /// falls before the earliest representable date.
    pub fn cutoff(&self, concert_start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let millis = (self.hours * 3_600_000.0).round() as i64;
        Duration::try_milliseconds(millis).and_then(|d| concert_start.checked_sub_signed(d))
    }

    /// `DeadlinePassed` once `now` is strictly after the cutoff. A cutoff
    /// that cannot be represented counts as already passed.
    pub fn check(&self, concert_start: DateTime<Utc>, now: DateTime<Utc>) -> DomainResult<()> {
        match self.cutoff(concert_start) {
            Some(cutoff) if now <= cutoff => Ok(()),
            _ => Err(DomainError::DeadlinePassed),
        }
    }
}

impl Default for CancellationDeadline {
    fn default() -> Self {
        Self {
            hours: Self::DEFAULT_HOURS,
        }
    }
}

pub struct CancellationPolicy {
    repos: Arc<dyn RepositoryProvider>,
    ledger: Arc<CapacityLedger>,
    default_deadline: CancellationDeadline,
}

impl CancellationPolicy {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        ledger: Arc<CapacityLedger>,
        default_deadline: CancellationDeadline,
    ) -> Self {
        Self {
            repos,
            ledger,
            default_deadline,
        }
    }

    pub async fn cancel(&self, reservation_id: i32) -> DomainResult<Reservation> {
        self.cancel_at(reservation_id, Utc::now()).await
    }

    /// Cancel as of `now`. Runs under the concert's lock so the status flip
    /// cannot interleave with an admission reading the seat count.
    pub async fn cancel_at(
        &self,
        reservation_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Reservation> {
        let reservations = self.repos.reservations();

        let concert_id = reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(DomainError::ReservationNotFound(reservation_id))?
            .concert_id;

        let _guard = self.ledger.lock(concert_id).await?;

        // Re-read under the lock: a concurrent cancel may have won.
        let mut reservation = reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(DomainError::ReservationNotFound(reservation_id))?;
        if !reservation.is_confirmed() {
            return Err(DomainError::AlreadyCancelled(reservation_id));
        }

        let concert = self
            .repos
            .concerts()
            .find_by_id(concert_id)
            .await?
            .ok_or(DomainError::ConcertNotFound(concert_id))?;

        let deadline = self.current_deadline().await?;
        debug!(
            reservation_id,
            deadline_hours = deadline.hours(),
            cutoff = ?deadline.cutoff(concert.start_at),
            "Checking cancellation deadline"
        );
        if let Err(e) = deadline.check(concert.start_at, now) {
            metrics::counter!("reservations_cancel_refused_total").increment(1);
            return Err(e);
        }

        reservations
            .update_status(reservation_id, ReservationStatus::Cancelled)
            .await?;
        reservation.cancel();

        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(
            reservation_id,
            concert_id,
            quantity = reservation.quantity,
            "Reservation cancelled"
        );
        Ok(reservation)
    }

    async fn current_deadline(&self) -> DomainResult<CancellationDeadline> {
        let raw = self.repos.parameters().get(CANCEL_DEADLINE_HOURS).await?;
        Ok(CancellationDeadline::from_parameter(
            raw.as_deref(),
            self.default_deadline,
        ))
    }
}
