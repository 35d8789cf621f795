//! Stage aggregate

pub mod model;
pub mod repository;

pub use model::Stage;
pub use repository::StageRepository;
