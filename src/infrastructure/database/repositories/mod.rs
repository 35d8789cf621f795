//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod artist_repository;
pub mod concert_repository;
pub mod parameter_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod stage_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
