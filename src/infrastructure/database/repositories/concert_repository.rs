//! SeaORM implementation of ConcertRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{
    Concert, ConcertDetails, ConcertDraft, ConcertFilter, ConcertRepository, ConcertStatus,
    DomainResult, ReservationStatus,
};
use crate::infrastructure::database::entities::{artist, concert, reservation, stage};

pub struct SeaOrmConcertRepository {
    db: DatabaseConnection,
}

impl SeaOrmConcertRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Join names and confirmed seat sums onto already-ordered concerts.
    async fn with_details(&self, concerts: Vec<Concert>) -> DomainResult<Vec<ConcertDetails>> {
        if concerts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = concerts.iter().map(|c| c.id).collect();
        let artist_ids: Vec<i32> = concerts.iter().map(|c| c.artist_id).collect();
        let stage_ids: Vec<i32> = concerts.iter().map(|c| c.stage_id).collect();

        let artists: HashMap<i32, String> = artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();
        let stages: HashMap<i32, (String, i32)> = stage::Entity::find()
            .filter(stage::Column::Id.is_in(stage_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|s| (s.id, (s.name, s.capacity)))
            .collect();
        let reserved = confirmed_sums(&self.db, ids).await?;

        Ok(concerts
            .into_iter()
            .map(|c| {
                let (stage_name, stage_capacity) =
                    stages.get(&c.stage_id).cloned().unwrap_or_default();
                ConcertDetails {
                    artist_name: artists.get(&c.artist_id).cloned().unwrap_or_default(),
                    stage_name,
                    stage_capacity,
                    reserved: reserved.get(&c.id).copied().unwrap_or(0),
                    concert: c,
                }
            })
            .collect())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: concert::Model) -> Concert {
    Concert {
        id: m.id,
        stage_id: m.stage_id,
        artist_id: m.artist_id,
        start_at: m.start_at,
        end_at: m.end_at,
        max_capacity: m.max_capacity,
        status: ConcertStatus::from_str(&m.status),
    }
}

/// Confirmed quantity per concert id; concerts without reservations are absent.
pub(super) async fn confirmed_sums<C: ConnectionTrait>(
    db: &C,
    concert_ids: Vec<i32>,
) -> DomainResult<HashMap<i32, i64>> {
    let rows: Vec<(i32, Option<i64>)> = reservation::Entity::find()
        .select_only()
        .column(reservation::Column::ConcertId)
        .column_as(reservation::Column::Quantity.sum(), "reserved")
        .filter(reservation::Column::ConcertId.is_in(concert_ids))
        .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()))
        .group_by(reservation::Column::ConcertId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(id, sum)| (id, sum.unwrap_or(0)))
        .collect())
}

// ── ConcertRepository impl ──────────────────────────────────────

#[async_trait]
impl ConcertRepository for SeaOrmConcertRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Concert>> {
        let model = concert::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_details(&self, filter: &ConcertFilter) -> DomainResult<Vec<ConcertDetails>> {
        let mut query = concert::Entity::find();
        if let Some(stage_id) = filter.stage_id {
            query = query.filter(concert::Column::StageId.eq(stage_id));
        }
        if let Some(day) = filter.day {
            let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
            // An unrepresentable next day leaves an empty range.
            let end = start.checked_add_days(Days::new(1)).unwrap_or(start);
            query = query
                .filter(concert::Column::StartAt.gte(start))
                .filter(concert::Column::StartAt.lt(end));
        }

        let concerts = query
            .order_by_asc(concert::Column::StartAt)
            .order_by_asc(concert::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_domain)
            .collect();
        self.with_details(concerts).await
    }

    async fn find_details_by_id(&self, id: i32) -> DomainResult<Option<ConcertDetails>> {
        let Some(concert) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.with_details(vec![concert]).await?.into_iter().next())
    }

    async fn find_overlap(
        &self,
        stage_id: i32,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_id: Option<i32>,
    ) -> DomainResult<Option<Concert>> {
        let mut query = concert::Entity::find()
            .filter(concert::Column::StageId.eq(stage_id))
            .filter(concert::Column::StartAt.lt(end_at))
            .filter(concert::Column::EndAt.gt(start_at));
        if let Some(id) = exclude_id {
            query = query.filter(concert::Column::Id.ne(id));
        }
        let model = query.one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, d: ConcertDraft) -> DomainResult<Concert> {
        let model = concert::ActiveModel {
            id: NotSet,
            stage_id: Set(d.stage_id),
            artist_id: Set(d.artist_id),
            start_at: Set(d.start_at),
            end_at: Set(d.end_at),
            max_capacity: Set(d.max_capacity),
            status: Set(ConcertStatus::Scheduled.as_str().to_string()),
        }
        .insert(&self.db)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn update(&self, id: i32, d: ConcertDraft) -> DomainResult<Option<Concert>> {
        let Some(existing) = concert::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut model: concert::ActiveModel = existing.into();
        model.stage_id = Set(d.stage_id);
        model.artist_id = Set(d.artist_id);
        model.start_at = Set(d.start_at);
        model.end_at = Set(d.end_at);
        model.max_capacity = Set(d.max_capacity);
        let updated = model.update(&self.db).await?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn update_status(&self, id: i32, status: ConcertStatus) -> DomainResult<Option<Concert>> {
        let Some(existing) = concert::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut model: concert::ActiveModel = existing.into();
        model.status = Set(status.as_str().to_string());
        let updated = model.update(&self.db).await?;
        Ok(Some(model_to_domain(updated)))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let res = concert::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
