//! # Festival booking service
//!
//! Concert schedule, seat reservations and reports for a music festival.
//!
//! ## Architecture
//!
//! - **domain**: entities and repository interfaces
//! - **application**: booking core (capacity ledger, admission, cancellation
//!   policy), catalog, identity and reporting services
//! - **infrastructure**: SeaORM persistence, in-memory store, crypto
//! - **interfaces**: REST API with Swagger documentation
//! - **support**: errors, retry, shutdown and input normalization
//! - **server**: process runtime used by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::create_api_router;
