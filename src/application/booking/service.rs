//! Reservation use-cases exposed to the HTTP layer
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;
use std::time::Duration;

use super::admission::AdmissionEngine;
use super::cancellation::{CancellationDeadline, CancellationPolicy};
use super::ledger::CapacityLedger;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Reservation};
use crate::support::retry::{retry_with_backoff, RetryConfig};
use crate::support::validations::normalize_email;

/// Tunables of the booking core
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Upper bound on waiting for a concert's exclusive lock
    pub lock_timeout: Duration,
    /// Used when `CANCEL_DEADLINE_HOURS` is unset or unparsable
    pub default_deadline: CancellationDeadline,
    /// Attempts made on `Busy` before giving up (1 = no retry)
    pub busy_retry_attempts: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            default_deadline: CancellationDeadline::default(),
            busy_retry_attempts: 3,
        }
    }
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    ledger: Arc<CapacityLedger>,
    admission: AdmissionEngine,
    cancellation: CancellationPolicy,
    retry: RetryConfig,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: BookingConfig) -> Self {
        let ledger = Arc::new(CapacityLedger::new(config.lock_timeout));
        Self {
            admission: AdmissionEngine::new(repos.clone(), ledger.clone()),
            cancellation: CancellationPolicy::new(
                repos.clone(),
                ledger.clone(),
                config.default_deadline,
            ),
            retry: RetryConfig::with_attempts(config.busy_retry_attempts),
            repos,
            ledger,
        }
    }

    pub fn ledger(&self) -> &Arc<CapacityLedger> {
        &self.ledger
    }

    /// Admit a reservation, retrying with backoff while the concert is busy.
    pub async fn request(
        &self,
        concert_id: i32,
        email: &str,
        quantity: i32,
    ) -> DomainResult<Reservation> {
        retry_with_backoff(
            &self.retry,
            || self.admission.request_reservation(concert_id, email, quantity),
            |e: &DomainError| matches!(e, DomainError::Busy(_)),
            "request_reservation",
        )
        .await
    }

    pub async fn cancel(&self, reservation_id: i32) -> DomainResult<Reservation> {
        retry_with_backoff(
            &self.retry,
            || self.cancellation.cancel(reservation_id),
            |e: &DomainError| matches!(e, DomainError::Busy(_)),
            "cancel_reservation",
        )
        .await
    }

    pub async fn get(&self, reservation_id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or(DomainError::ReservationNotFound(reservation_id))
    }

    /// All reservations, or only those of `email` when given.
    pub async fn list(&self, email: Option<&str>) -> DomainResult<Vec<Reservation>> {
        match email {
            Some(raw) => {
                let email = normalize_email(raw)
                    .ok_or_else(|| DomainError::Validation("invalid email filter".into()))?;
                self.repos.reservations().find_by_email(&email).await
            }
            None => self.repos.reservations().find_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConcertDraft;
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::{Duration as ChronoDuration, Utc};

    async fn service_with_concert() -> (BookingService, i32) {
        service_with(BookingConfig::default()).await
    }

    async fn service_with(config: BookingConfig) -> (BookingService, i32) {
        let store = Arc::new(InMemoryStore::new());
        let start = Utc::now() + ChronoDuration::days(3);
        let id = store
            .concerts()
            .create(ConcertDraft {
                stage_id: 1,
                artist_id: 1,
                start_at: start,
                end_at: start + ChronoDuration::hours(1),
                max_capacity: 10,
            })
            .await
            .unwrap()
            .id;
        (BookingService::new(store, config), id)
    }

    #[tokio::test]
    async fn list_filters_by_normalized_email() {
        let (service, id) = service_with_concert().await;
        service.request(id, "Alice@Fest.io", 1).await.unwrap();
        service.request(id, "bob@fest.io", 1).await.unwrap();

        let mine = service.list(Some(" ALICE@fest.io")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].email, "alice@fest.io");
        assert_eq!(service.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn busy_is_retried_until_the_lock_frees() {
        let (service, id) = service_with(BookingConfig {
            lock_timeout: Duration::from_millis(10),
            busy_retry_attempts: 5,
            ..BookingConfig::default()
        })
        .await;
        let ledger = service.ledger().clone();

        let held = ledger.lock(id).await.unwrap();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(held);
        });

        let reservation = service.request(id, "late@fest.io", 2).await.unwrap();
        assert_eq!(reservation.quantity, 2);
    }

    #[tokio::test]
    async fn get_missing_reservation() {
        let (service, _) = service_with_concert().await;
        assert_eq!(service.get(7).await.unwrap_err(), DomainError::ReservationNotFound(7));
    }
}
