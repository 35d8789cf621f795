//! Reservation admission core: capacity ledger, admission engine and
//! cancellation policy.

pub mod admission;
pub mod cancellation;
pub mod ledger;
pub mod service;

pub use admission::AdmissionEngine;
pub use cancellation::{CancellationDeadline, CancellationPolicy};
pub use ledger::{CapacityLedger, ConcertLocks, LedgerGuard, LedgerSession};
pub use service::{BookingConfig, BookingService};
