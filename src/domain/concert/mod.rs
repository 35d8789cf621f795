//! Concert aggregate

pub mod model;
pub mod repository;

pub use model::{
    overlaps, Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertPatch, ConcertStatus,
};
pub use repository::ConcertRepository;
