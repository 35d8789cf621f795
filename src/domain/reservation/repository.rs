//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationStatus};
use crate::domain::concert::Concert;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// All reservations, newest first
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// Reservations made with a normalized email, newest first
    async fn find_by_email(&self, email: &str) -> DomainResult<Vec<Reservation>>;

    /// Set the status of an existing reservation
    async fn update_status(&self, id: i32, status: ReservationStatus) -> DomainResult<()>;

    /// Sum of confirmed quantities outside any lock (listing/reporting only)
    async fn sum_confirmed_quantity(&self, concert_id: i32) -> DomainResult<i64>;

    /// Open the unit of work used to admit a reservation for `concert_id`.
    ///
    /// The concert row is read while opening, under an exclusive lock where
    /// the backend supports one, so a caller bounding this call with a
    /// timeout also bounds the wait for that lock. Every read and write done
    /// through the returned scope belongs to one atomic unit. Dropping the
    /// scope without [`AdmissionScope::commit`] discards the insert.
    async fn begin_admission(&self, concert_id: i32) -> DomainResult<Box<dyn AdmissionScope>>;
}

/// Atomic read-check-insert unit scoped to a single concert.
#[async_trait]
pub trait AdmissionScope: Send {
    /// The concert this scope was opened for, `None` if it does not exist
    fn concert(&self) -> Option<&Concert>;

    /// Confirmed reservation held by `email` for this concert, if any
    async fn find_confirmed(&mut self, email: &str) -> DomainResult<Option<Reservation>>;

    /// Sum of `quantity` over confirmed reservations for this concert
    async fn sum_confirmed_quantity(&mut self) -> DomainResult<i64>;

    /// Stage a confirmed reservation; visible to this scope immediately
    async fn insert(&mut self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Make the staged insert durable and release the scope
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
