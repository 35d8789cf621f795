//! Capacity ledger
//!
//! Answers "how many seats are confirmed for concert X" in a way that is
//! consistent with the admission decision taken from the answer. Reads go
//! through a [`LedgerSession`], which can only be obtained while holding the
//! concert's exclusive lock, so two callers can never both act on the same
//! stale seat count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::domain::{
    AdmissionScope, Concert, DomainError, DomainResult, NewReservation, Reservation,
    ReservationRepository,
};

/// One async mutex per concert id. Different concerts never contend.
#[derive(Default)]
pub struct ConcertLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl ConcertLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait at most `timeout` for the lock of `concert_id`.
    pub async fn acquire(
        &self,
        concert_id: i32,
        timeout: Duration,
    ) -> DomainResult<OwnedMutexGuard<()>> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = Arc::clone(&self.locks.entry(concert_id).or_default());

        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                warn!(concert_id, timeout_ms = timeout.as_millis() as u64, "Concert lock timed out");
                DomainError::Busy(concert_id)
            })
    }

    /// Drop the lock entry of a deleted concert. Callers hold the concert's
    /// guard, so anyone still queued on the old mutex wakes up after the row
    /// is gone. Concert ids are never reused, so a fresh entry created later
    /// for the same id only ever guards a missing concert.
    fn forget(&self, concert_id: i32) {
        self.locks.remove(&concert_id);
    }

    fn is_tracked(&self, concert_id: i32) -> bool {
        self.locks.contains_key(&concert_id)
    }
}

/// Proof that the caller holds the exclusive lock of one concert.
pub struct LedgerGuard {
    concert_id: i32,
    acquired_at: Instant,
    _guard: OwnedMutexGuard<()>,
}

impl LedgerGuard {
    pub fn concert_id(&self) -> i32 {
        self.concert_id
    }
}

impl Drop for LedgerGuard {
    fn drop(&mut self) {
        debug!(
            concert_id = self.concert_id,
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "Concert lock released"
        );
    }
}

/// Exclusive admission session for one concert: the lock guard plus the
/// store's unit of work, released together.
pub struct LedgerSession {
    // Field order matters: the scope is rolled back before the lock is released.
    scope: Box<dyn AdmissionScope>,
    guard: LedgerGuard,
}

impl LedgerSession {
    pub fn concert_id(&self) -> i32 {
        self.guard.concert_id()
    }

    pub fn concert(&self) -> Option<&Concert> {
        self.scope.concert()
    }

    pub async fn find_confirmed(&mut self, email: &str) -> DomainResult<Option<Reservation>> {
        self.scope.find_confirmed(email).await
    }

    /// Confirmed seat count for the locked concert.
    pub async fn reserved_seats(&mut self) -> DomainResult<i64> {
        let reserved = self.scope.sum_confirmed_quantity().await?;
        Ok(reserved.max(0))
    }

    pub async fn insert(&mut self, reservation: NewReservation) -> DomainResult<Reservation> {
        self.scope.insert(reservation).await
    }

    pub async fn commit(self) -> DomainResult<()> {
        let LedgerSession { scope, guard } = self;
        scope.commit().await?;
        drop(guard);
        Ok(())
    }
}

/// Serializes admission decisions per concert.
pub struct CapacityLedger {
    locks: ConcertLocks,
    lock_timeout: Duration,
}

impl CapacityLedger {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            locks: ConcertLocks::new(),
            lock_timeout,
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Take the in-process lock of `concert_id`, failing with
    /// [`DomainError::Busy`] after the configured timeout.
    pub async fn lock(&self, concert_id: i32) -> DomainResult<LedgerGuard> {
        let guard = self.locks.acquire(concert_id, self.lock_timeout).await?;
        Ok(LedgerGuard {
            concert_id,
            acquired_at: Instant::now(),
            _guard: guard,
        })
    }

    /// Lock `concert_id` and open the store's admission scope.
    ///
    /// Both steps share one time budget; running out of it at either step
    /// yields [`DomainError::Busy`].
    pub async fn open(
        &self,
        reservations: &dyn ReservationRepository,
        concert_id: i32,
    ) -> DomainResult<LedgerSession> {
        let started = Instant::now();
        let guard = self.lock(concert_id).await?;

        let budget = self.lock_timeout.saturating_sub(started.elapsed());
        let scope = tokio::time::timeout(budget, reservations.begin_admission(concert_id))
            .await
            .map_err(|_| {
                warn!(concert_id, "Timed out opening admission scope");
                DomainError::Busy(concert_id)
            })??;

        Ok(LedgerSession { scope, guard })
    }

    /// Drop bookkeeping for a concert deleted under `guard`. The entry is
    /// removed before the guard is released.
    pub fn forget(&self, guard: LedgerGuard) {
        self.locks.forget(guard.concert_id);
        drop(guard);
    }

    pub fn is_tracked(&self, concert_id: i32) -> bool {
        self.locks.is_tracked(concert_id)
    }

    /// Seats still available. Never negative, even if capacity was lowered
    /// below the confirmed total by an administrative update.
    pub fn remaining(max_capacity: i32, reserved: i64) -> i64 {
        (i64::from(max_capacity) - reserved).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_locker_times_out_with_busy() {
        let ledger = CapacityLedger::new(Duration::from_millis(20));
        let _held = ledger.lock(1).await.unwrap();

        let err = ledger.lock(1).await.err().unwrap();
        assert_eq!(err, DomainError::Busy(1));
    }

    #[tokio::test]
    async fn different_concerts_do_not_contend() {
        let ledger = CapacityLedger::new(Duration::from_millis(20));
        let _a = ledger.lock(1).await.unwrap();
        let b = ledger.lock(2).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn lock_is_released_on_drop() {
        let ledger = CapacityLedger::new(Duration::from_millis(20));
        {
            let guard = ledger.lock(3).await.unwrap();
            assert_eq!(guard.concert_id(), 3);
        }
        assert!(ledger.lock(3).await.is_ok());
    }

    #[tokio::test]
    async fn forget_removes_entry_before_waiters_resume() {
        let ledger = Arc::new(CapacityLedger::new(Duration::from_secs(1)));
        let guard = ledger.lock(4).await.unwrap();

        let waiter = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.lock(4).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        ledger.forget(guard);
        assert!(!ledger.is_tracked(4));
        assert!(waiter.await.unwrap().is_ok());
    }

    #[test]
    fn remaining_is_clamped_at_zero() {
        assert_eq!(CapacityLedger::remaining(100, 60), 40);
        assert_eq!(CapacityLedger::remaining(100, 100), 0);
        assert_eq!(CapacityLedger::remaining(50, 80), 0);
    }
}
