//! Application layer: use-case orchestration over the domain repositories.

pub mod booking;
pub mod catalog;
pub mod identity;
pub mod reporting;

pub use booking::{
    AdmissionEngine, BookingConfig, BookingService, CancellationDeadline, CancellationPolicy,
    CapacityLedger,
};
pub use catalog::{ArtistService, ConcertService, ParameterService, StageDraft, StageService};
pub use identity::{AuthResult, UserService};
pub use reporting::ReportService;
