//! Admission engine
//!
//! Decides whether a reservation request may be confirmed. The duplicate
//! check, the seat count and the insert all run inside one
//! [`LedgerSession`], so concurrent requests for the same concert are
//! admitted one at a time and can never oversell.

use std::sync::Arc;

use tracing::{info, warn};

use super::ledger::{CapacityLedger, LedgerSession};
use crate::domain::{DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation};
use crate::support::validations::normalize_email;

pub struct AdmissionEngine {
    repos: Arc<dyn RepositoryProvider>,
    ledger: Arc<CapacityLedger>,
}

impl AdmissionEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>, ledger: Arc<CapacityLedger>) -> Self {
        Self { repos, ledger }
    }

    /// Confirm `quantity` seats of `concert_id` for `email`.
    ///
    /// Fails with `DuplicateReservation` if the email already holds a
    /// confirmed reservation for the concert (checked before capacity), and
    /// with `InsufficientCapacity` if fewer than `quantity` seats remain.
    /// Asking for exactly the remaining seats succeeds.
    pub async fn request_reservation(
        &self,
        concert_id: i32,
        email: &str,
        quantity: i32,
    ) -> DomainResult<Reservation> {
        let request = Self::validate(concert_id, email, quantity)?;

        let session = match self
            .ledger
            .open(self.repos.reservations(), concert_id)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                record_rejection(&e);
                return Err(e);
            }
        };

        match Self::admit(session, request).await {
            Ok(reservation) => {
                metrics::counter!("reservations_admitted_total").increment(1);
                metrics::counter!("reservation_seats_admitted_total")
                    .increment(reservation.quantity as u64);
                info!(
                    reservation_id = reservation.id,
                    concert_id,
                    quantity = reservation.quantity,
                    "Reservation confirmed"
                );
                Ok(reservation)
            }
            Err(e) => {
                record_rejection(&e);
                Err(e)
            }
        }
    }

    fn validate(concert_id: i32, email: &str, quantity: i32) -> DomainResult<NewReservation> {
        if concert_id <= 0 {
            return Err(DomainError::ConcertNotFound(concert_id));
        }
        let email = normalize_email(email)
            .ok_or_else(|| DomainError::Validation("a valid email is required".into()))?;
        if quantity < 1 {
            return Err(DomainError::Validation("quantity must be at least 1".into()));
        }
        Ok(NewReservation {
            concert_id,
            email,
            quantity,
        })
    }

    async fn admit(
        mut session: LedgerSession,
        request: NewReservation,
    ) -> DomainResult<Reservation> {
        let concert_id = session.concert_id();
        let max_capacity = match session.concert() {
            Some(concert) => concert.max_capacity,
            None => return Err(DomainError::ConcertNotFound(concert_id)),
        };

        if session.find_confirmed(&request.email).await?.is_some() {
            return Err(DomainError::DuplicateReservation {
                concert_id,
                email: request.email,
            });
        }

        let reserved = session.reserved_seats().await?;
        let remaining = CapacityLedger::remaining(max_capacity, reserved);
        if i64::from(request.quantity) > remaining {
            return Err(DomainError::InsufficientCapacity { remaining });
        }

        let reservation = session.insert(request).await?;
        session.commit().await?;
        Ok(reservation)
    }
}

fn record_rejection(err: &DomainError) {
    let reason = match err {
        DomainError::ConcertNotFound(_) => "concert_not_found",
        DomainError::DuplicateReservation { .. } => "duplicate",
        DomainError::InsufficientCapacity { .. } => "insufficient_capacity",
        DomainError::Busy(_) => "busy",
        DomainError::Validation(_) => "validation",
        _ => "storage",
    };
    metrics::counter!("reservations_rejected_total", "reason" => reason).increment(1);

    if err.is_transient() {
        warn!(error = %err, "Reservation request failed");
    } else {
        info!(reason, "Reservation rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConcertDraft, RepositoryProvider};
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    async fn setup(capacity: i32) -> (AdmissionEngine, Arc<InMemoryStore>, i32) {
        let store = Arc::new(InMemoryStore::new());
        let concert_id = seed_concert(&store, capacity).await;
        let ledger = Arc::new(CapacityLedger::new(Duration::from_secs(5)));
        let engine = AdmissionEngine::new(store.clone(), ledger);
        (engine, store, concert_id)
    }

    async fn seed_concert(store: &InMemoryStore, capacity: i32) -> i32 {
        let start = Utc::now() + ChronoDuration::hours(48);
        store
            .concerts()
            .create(ConcertDraft {
                stage_id: 1,
                artist_id: 1,
                start_at: start,
                end_at: start + ChronoDuration::hours(2),
                max_capacity: capacity,
            })
            .await
            .unwrap()
            .id
    }

    async fn reserved(store: &InMemoryStore, concert_id: i32) -> i64 {
        store
            .reservations()
            .sum_confirmed_quantity(concert_id)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn admits_until_capacity_is_exhausted() {
        let (engine, store, id) = setup(100).await;

        let first = engine.request_reservation(id, "a@fest.io", 60).await.unwrap();
        assert!(first.is_confirmed());
        assert_eq!(reserved(&store, id).await, 60);

        let err = engine.request_reservation(id, "b@fest.io", 50).await.unwrap_err();
        assert_eq!(err, DomainError::InsufficientCapacity { remaining: 40 });

        // Exactly the remaining seats is accepted.
        engine.request_reservation(id, "c@fest.io", 40).await.unwrap();
        assert_eq!(reserved(&store, id).await, 100);

        let err = engine.request_reservation(id, "d@fest.io", 1).await.unwrap_err();
        assert_eq!(err, DomainError::InsufficientCapacity { remaining: 0 });
    }

    #[tokio::test]
    async fn same_email_cannot_book_twice() {
        let (engine, _, id) = setup(100).await;

        engine.request_reservation(id, "fan@fest.io", 1).await.unwrap();
        let err = engine
            .request_reservation(id, "  FAN@Fest.io ", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReservation { .. }));
    }

    #[tokio::test]
    async fn duplicate_is_reported_before_capacity() {
        let (engine, _, id) = setup(2).await;

        engine.request_reservation(id, "fan@fest.io", 2).await.unwrap();
        let err = engine.request_reservation(id, "fan@fest.io", 5).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReservation { .. }));
    }

    #[tokio::test]
    async fn cancelled_reservation_frees_the_email() {
        let (engine, store, id) = setup(10).await;

        let r = engine.request_reservation(id, "fan@fest.io", 3).await.unwrap();
        store
            .reservations()
            .update_status(r.id, crate::domain::ReservationStatus::Cancelled)
            .await
            .unwrap();

        let again = engine.request_reservation(id, "fan@fest.io", 3).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn unknown_concert_is_rejected() {
        let (engine, _, _) = setup(10).await;
        let err = engine.request_reservation(999, "x@fest.io", 1).await.unwrap_err();
        assert_eq!(err, DomainError::ConcertNotFound(999));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_locking() {
        let (engine, _, id) = setup(10).await;

        let err = engine.request_reservation(id, "   ", 1).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = engine.request_reservation(id, "x@fest.io", 0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_capacity_concert_rejects_everything() {
        let (engine, _, id) = setup(0).await;
        let err = engine.request_reservation(id, "x@fest.io", 1).await.unwrap_err();
        assert_eq!(err, DomainError::InsufficientCapacity { remaining: 0 });
    }

    #[tokio::test]
    async fn busy_when_lock_is_held_past_timeout() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed_concert(&store, 10).await;
        let ledger = Arc::new(CapacityLedger::new(Duration::from_millis(20)));
        let engine = AdmissionEngine::new(store.clone(), ledger.clone());

        let _held = ledger.lock(id).await.unwrap();
        let err = engine.request_reservation(id, "x@fest.io", 1).await.unwrap_err();
        assert_eq!(err, DomainError::Busy(id));
        assert!(err.is_transient());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_never_oversell() {
        const CAPACITY: i32 = 25;
        const REQUESTS: usize = 80;

        let (engine, store, id) = setup(CAPACITY).await;
        let engine = Arc::new(engine);

        let mut handles = Vec::with_capacity(REQUESTS);
        for i in 0..REQUESTS {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine
                    .request_reservation(id, &format!("fan{i}@fest.io"), 1)
                    .await
            }));
        }

        let mut admitted = 0;
        let mut sold_out = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(DomainError::InsufficientCapacity { remaining: 0 }) => sold_out += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(admitted, CAPACITY as usize);
        assert_eq!(sold_out, REQUESTS - CAPACITY as usize);
        assert_eq!(reserved(&store, id).await, i64::from(CAPACITY));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicates_admit_one() {
        let (engine, _, id) = setup(100).await;
        let engine = Arc::new(engine);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.request_reservation(id, "same@fest.io", 1).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }
}
