//! Concert scheduling
//!
//! Schedule changes that touch capacity take the concert's ledger lock, so an
//! organizer shrinking a concert can never race an admission reading the
//! old capacity.

use std::sync::Arc;

use tracing::info;

use crate::application::booking::CapacityLedger;
use crate::domain::{
    Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertPatch, ConcertStatus,
    DomainError, DomainResult, RepositoryProvider,
};

pub struct ConcertService {
    repos: Arc<dyn RepositoryProvider>,
    ledger: Arc<CapacityLedger>,
}

impl ConcertService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, ledger: Arc<CapacityLedger>) -> Self {
        Self { repos, ledger }
    }

    pub async fn list(&self, filter: &ConcertFilter) -> DomainResult<Vec<ConcertDetails>> {
        self.repos.concerts().find_details(filter).await
    }

    pub async fn details(&self, id: i32) -> DomainResult<ConcertDetails> {
        self.repos
            .concerts()
            .find_details_by_id(id)
            .await?
            .ok_or(DomainError::ConcertNotFound(id))
    }

    /// Public programme: concerts that still have seats.
    pub async fn programming(&self) -> DomainResult<Vec<ConcertDetails>> {
        let all = self.list(&ConcertFilter::default()).await?;
        Ok(all.into_iter().filter(|d| d.remaining() > 0).collect())
    }

    pub async fn create(&self, draft: ConcertDraft) -> DomainResult<Concert> {
        self.validate(&draft, None).await?;
        let concert = self.repos.concerts().create(draft).await?;
        info!(
            concert_id = concert.id,
            stage_id = concert.stage_id,
            max_capacity = concert.max_capacity,
            "Concert scheduled"
        );
        Ok(concert)
    }

    pub async fn update(&self, id: i32, patch: ConcertPatch) -> DomainResult<Concert> {
        let _guard = self.ledger.lock(id).await?;

        let current = self
            .repos
            .concerts()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ConcertNotFound(id))?;
        let draft = ConcertDraft::merge(&current, patch);
        self.validate(&draft, Some(id)).await?;

        let reserved = self.repos.reservations().sum_confirmed_quantity(id).await?;
        if i64::from(draft.max_capacity) < reserved {
            return Err(DomainError::Conflict(format!(
                "{reserved} seats are already reserved"
            )));
        }

        let updated = self
            .repos
            .concerts()
            .update(id, draft)
            .await?
            .ok_or(DomainError::ConcertNotFound(id))?;
        info!(concert_id = id, "Concert updated");
        Ok(updated)
    }

    pub async fn set_status(&self, id: i32, status: ConcertStatus) -> DomainResult<Concert> {
        let concert = self
            .repos
            .concerts()
            .update_status(id, status)
            .await?
            .ok_or(DomainError::ConcertNotFound(id))?;
        info!(concert_id = id, status = %status, "Concert status changed");
        Ok(concert)
    }

    /// Refused while confirmed reservations exist; cancel the concert instead.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let guard = self.ledger.lock(id).await?;

        if self.repos.concerts().find_by_id(id).await?.is_none() {
            return Err(DomainError::ConcertNotFound(id));
        }
        let reserved = self.repos.reservations().sum_confirmed_quantity(id).await?;
        if reserved > 0 {
            return Err(DomainError::Conflict(format!(
                "concert {id} has {reserved} reserved seats"
            )));
        }

        self.repos.concerts().delete(id).await?;
        self.ledger.forget(guard);
        info!(concert_id = id, "Concert deleted");
        Ok(())
    }

    async fn validate(&self, draft: &ConcertDraft, exclude_id: Option<i32>) -> DomainResult<()> {
        draft.validate()?;

        let stage = self
            .repos
            .stages()
            .find_by_id(draft.stage_id)
            .await?
            .ok_or_else(|| DomainError::Validation(format!("stage {} does not exist", draft.stage_id)))?;
        if self.repos.artists().find_by_id(draft.artist_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "artist {} does not exist",
                draft.artist_id
            )));
        }
        if draft.max_capacity > stage.capacity {
            return Err(DomainError::Validation(format!(
                "max_capacity {} exceeds stage capacity {}",
                draft.max_capacity, stage.capacity
            )));
        }

        let overlap = self
            .repos
            .concerts()
            .find_overlap(draft.stage_id, draft.start_at, draft.end_at, exclude_id)
            .await?;
        if let Some(other) = overlap {
            return Err(DomainError::Conflict(format!(
                "stage {} is already booked by concert {}",
                draft.stage_id, other.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::AdmissionEngine;
    use crate::domain::{Artist, Stage};
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::time::Duration as StdDuration;

    struct Fixture {
        store: Arc<InMemoryStore>,
        ledger: Arc<CapacityLedger>,
        service: ConcertService,
        stage_id: i32,
        artist_id: i32,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let ledger = Arc::new(CapacityLedger::new(StdDuration::from_secs(1)));
        let stage_id = store
            .stages()
            .create(Stage { id: 0, name: "Main".into(), capacity: 500 })
            .await
            .unwrap()
            .id;
        let artist_id = store
            .artists()
            .create(Artist {
                id: 0,
                name: "Nova".into(),
                genre: None,
                bio_short: None,
                links: None,
            })
            .await
            .unwrap()
            .id;
        Fixture {
            service: ConcertService::new(store.clone(), ledger.clone()),
            store,
            ledger,
            stage_id,
            artist_id,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 7, day, hour, 0, 0).unwrap()
    }

    fn draft(f: &Fixture, start: DateTime<Utc>, capacity: i32) -> ConcertDraft {
        ConcertDraft {
            stage_id: f.stage_id,
            artist_id: f.artist_id,
            start_at: start,
            end_at: start + Duration::hours(2),
            max_capacity: capacity,
        }
    }

    #[tokio::test]
    async fn capacity_is_bounded_by_stage() {
        let f = fixture().await;
        assert!(f.service.create(draft(&f, at(1, 18), 500)).await.is_ok());

        let err = f.service.create(draft(&f, at(2, 18), 501)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn overlapping_slot_on_same_stage_conflicts() {
        let f = fixture().await;
        f.service.create(draft(&f, at(1, 18), 100)).await.unwrap();

        let err = f.service.create(draft(&f, at(1, 19), 100)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Back to back is fine.
        assert!(f.service.create(draft(&f, at(1, 20), 100)).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_references_are_invalid() {
        let f = fixture().await;
        let mut d = draft(&f, at(1, 18), 10);
        d.artist_id = 999;
        let err = f.service.create(d).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_merges_and_ignores_itself_for_overlap() {
        let f = fixture().await;
        let c = f.service.create(draft(&f, at(1, 18), 100)).await.unwrap();

        let updated = f
            .service
            .update(
                c.id,
                ConcertPatch {
                    end_at: Some(at(1, 21)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start_at, c.start_at);
        assert_eq!(updated.end_at, at(1, 21));
    }

    #[tokio::test]
    async fn capacity_cannot_drop_below_reserved_seats() {
        let f = fixture().await;
        let c = f.service.create(draft(&f, at(1, 18), 100)).await.unwrap();
        let engine = AdmissionEngine::new(f.store.clone(), f.ledger.clone());
        engine.request_reservation(c.id, "fan@fest.io", 30).await.unwrap();

        let err = f
            .service
            .update(
                c.id,
                ConcertPatch {
                    max_capacity: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = f.service.delete(c.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn programming_hides_sold_out_concerts() {
        let f = fixture().await;
        let full = f.service.create(draft(&f, at(1, 18), 1)).await.unwrap();
        let open = f.service.create(draft(&f, at(2, 18), 10)).await.unwrap();
        let engine = AdmissionEngine::new(f.store.clone(), f.ledger.clone());
        engine.request_reservation(full.id, "fan@fest.io", 1).await.unwrap();

        let ids: Vec<_> = f
            .service
            .programming()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.concert.id)
            .collect();
        assert_eq!(ids, vec![open.id]);
    }

    #[tokio::test]
    async fn list_filters_by_day() {
        let f = fixture().await;
        f.service.create(draft(&f, at(1, 18), 10)).await.unwrap();
        let second = f.service.create(draft(&f, at(2, 18), 10)).await.unwrap();

        let filter = ConcertFilter {
            day: Some(at(2, 0).date_naive()),
            stage_id: None,
        };
        let listed = f.service.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].concert.id, second.id);
        assert_eq!(listed[0].artist_name, "Nova");
    }

    #[tokio::test]
    async fn status_change_and_delete() {
        let f = fixture().await;
        let c = f.service.create(draft(&f, at(1, 18), 10)).await.unwrap();

        let cancelled = f.service.set_status(c.id, ConcertStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, ConcertStatus::Cancelled);

        f.service.delete(c.id).await.unwrap();
        assert!(!f.ledger.is_tracked(c.id));
        assert_eq!(
            f.service.details(c.id).await.unwrap_err(),
            DomainError::ConcertNotFound(c.id)
        );
    }
}
