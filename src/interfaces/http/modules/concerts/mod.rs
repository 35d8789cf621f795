//! Concert scheduling and the public programme

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
