//! Festival catalog: artists, stages, concerts and parameters.

pub mod artists;
pub mod concerts;
pub mod parameters;
pub mod stages;

pub use artists::ArtistService;
pub use concerts::ConcertService;
pub use parameters::ParameterService;
pub use stages::{StageDraft, StageService};
