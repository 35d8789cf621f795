//! Stage repository interface

use async_trait::async_trait;

use super::model::Stage;
use crate::domain::DomainResult;

#[async_trait]
pub trait StageRepository: Send + Sync {
    /// All stages, largest first
    async fn find_all(&self) -> DomainResult<Vec<Stage>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Stage>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Stage>>;
    /// Insert; `stage.id` is ignored
    async fn create(&self, stage: Stage) -> DomainResult<Stage>;
    async fn update(&self, stage: Stage) -> DomainResult<Stage>;
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
