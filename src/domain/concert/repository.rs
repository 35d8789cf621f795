//! Concert repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ConcertRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Concert>>;

    /// Concerts with artist/stage names and confirmed seat counts,
    /// ordered by start time then id
    async fn find_details(&self, filter: &ConcertFilter) -> DomainResult<Vec<ConcertDetails>>;

    async fn find_details_by_id(&self, id: i32) -> DomainResult<Option<ConcertDetails>>;

    /// First concert on `stage_id` whose time range intersects `[start_at, end_at)`
    async fn find_overlap(
        &self,
        stage_id: i32,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_id: Option<i32>,
    ) -> DomainResult<Option<Concert>>;

    async fn create(&self, draft: ConcertDraft) -> DomainResult<Concert>;

    /// Replace the schedule fields; `None` if the concert does not exist
    async fn update(&self, id: i32, draft: ConcertDraft) -> DomainResult<Option<Concert>>;

    async fn update_status(&self, id: i32, status: ConcertStatus) -> DomainResult<Option<Concert>>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: i32) -> DomainResult<bool>;
}
