//! Domain layer: entities and repository interfaces for the festival.

pub mod artist;
pub mod concert;
pub mod parameter;
pub mod repositories;
pub mod reservation;
pub mod stage;
pub mod user;

pub use artist::{Artist, ArtistDraft, ArtistRepository};
pub use concert::{
    overlaps, Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertPatch, ConcertRepository,
    ConcertStatus,
};
pub use parameter::{Parameter, ParameterRepository, CANCEL_DEADLINE_HOURS};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    AdmissionScope, NewReservation, Reservation, ReservationRepository, ReservationStatus,
};
pub use stage::{Stage, StageRepository};
pub use user::{NewUser, User, UserRepository, UserRole};

// Re-export DomainError from support for convenience
pub use crate::support::errors::DomainError;
