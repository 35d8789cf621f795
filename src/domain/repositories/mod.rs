//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::artist::ArtistRepository;
use super::concert::ConcertRepository;
use super::parameter::ParameterRepository;
use super::reservation::ReservationRepository;
use super::stage::StageRepository;
use super::user::UserRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let concert = repos.concerts().find_by_id(1).await?;
///     let mine = repos.reservations().find_by_email("fan@example.com").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn artists(&self) -> &dyn ArtistRepository;
    fn stages(&self) -> &dyn StageRepository;
    fn concerts(&self) -> &dyn ConcertRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn parameters(&self) -> &dyn ParameterRepository;
    fn users(&self) -> &dyn UserRepository;
}
