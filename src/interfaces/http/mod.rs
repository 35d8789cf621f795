//! HTTP REST API
//!
//! - `common`: response envelope, domain error mapping, validated JSON
//! - `middleware`: bearer-token authentication and the organizer guard
//! - `modules`: one module per resource (dto + handlers)
//! - `router`: routes, middleware stack and the OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;


pub use router::{create_api_router, ApiDoc};
pub use state::AppState;
