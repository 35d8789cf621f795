//! Artist aggregate

pub mod model;
pub mod repository;

pub use model::{Artist, ArtistDraft};
pub use repository::ArtistRepository;
