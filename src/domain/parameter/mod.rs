//! Parameter store

pub mod model;
pub mod repository;

pub use model::{Parameter, CANCEL_DEADLINE_HOURS};
pub use repository::ParameterRepository;
