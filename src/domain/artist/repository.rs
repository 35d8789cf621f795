//! Artist repository interface

use async_trait::async_trait;

use super::model::Artist;
use crate::domain::DomainResult;

#[async_trait]
pub trait ArtistRepository: Send + Sync {
    /// All artists ordered by name
    async fn find_all(&self) -> DomainResult<Vec<Artist>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Artist>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Artist>>;
    /// Insert; `artist.id` is ignored
    async fn create(&self, artist: Artist) -> DomainResult<Artist>;
    async fn update(&self, artist: Artist) -> DomainResult<Artist>;
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
