//! Identity module: registration, login and the bootstrap organizer.

pub mod service;

pub use service::{AuthResult, UserService};
