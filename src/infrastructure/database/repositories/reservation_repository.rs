//! SeaORM implementation of ReservationRepository
//!
//! Admission runs in a [`SeaOrmAdmissionScope`]: one database transaction
//! in which the concert row is read (`FOR UPDATE` where the backend has row
//! locks), then the duplicate check, the seat sum and the insert.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use super::concert_repository::{self, confirmed_sums};
use crate::domain::{
    AdmissionScope, Concert, DomainError, DomainResult, NewReservation, Reservation,
    ReservationRepository, ReservationStatus,
};
use crate::infrastructure::database::entities::{concert, reservation};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        concert_id: m.concert_id,
        email: m.email,
        quantity: m.quantity,
        status: ReservationStatus::from_str(&m.status),
        created_at: m.created_at,
    }
}

async fn confirmed_sum<C: ConnectionTrait>(db: &C, concert_id: i32) -> DomainResult<i64> {
    let sums = confirmed_sums(db, vec![concert_id]).await?;
    Ok(sums.get(&concert_id).copied().unwrap_or(0))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::Email.eq(email))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(&self, id: i32, status: ReservationStatus) -> DomainResult<()> {
        let Some(existing) = reservation::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(DomainError::ReservationNotFound(id));
        };
        let mut model: reservation::ActiveModel = existing.into();
        model.status = Set(status.as_str().to_string());
        model.update(&self.db).await?;
        Ok(())
    }

    async fn sum_confirmed_quantity(&self, concert_id: i32) -> DomainResult<i64> {
        confirmed_sum(&self.db, concert_id).await
    }

    async fn begin_admission(&self, concert_id: i32) -> DomainResult<Box<dyn AdmissionScope>> {
        let txn = self.db.begin().await?;

        let mut query = concert::Entity::find_by_id(concert_id);
        // SQLite has no row locks; the in-process ledger lock covers it.
        if self.db.get_database_backend() != DbBackend::Sqlite {
            query = query.lock_exclusive();
        }
        let concert = query
            .one(&txn)
            .await?
            .map(concert_repository::model_to_domain);

        debug!(concert_id, found = concert.is_some(), "Admission transaction opened");
        Ok(Box::new(SeaOrmAdmissionScope {
            txn,
            concert_id,
            concert,
        }))
    }
}

/// Admission unit of work; rolled back on drop unless committed.
pub struct SeaOrmAdmissionScope {
    txn: DatabaseTransaction,
    concert_id: i32,
    concert: Option<Concert>,
}

#[async_trait]
impl AdmissionScope for SeaOrmAdmissionScope {
    fn concert(&self) -> Option<&Concert> {
        self.concert.as_ref()
    }

    async fn find_confirmed(&mut self, email: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find()
            .filter(reservation::Column::ConcertId.eq(self.concert_id))
            .filter(reservation::Column::Email.eq(email))
            .filter(reservation::Column::Status.eq(ReservationStatus::Confirmed.as_str()))
            .one(&self.txn)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn sum_confirmed_quantity(&mut self) -> DomainResult<i64> {
        confirmed_sum(&self.txn, self.concert_id).await
    }

    async fn insert(&mut self, r: NewReservation) -> DomainResult<Reservation> {
        let model = reservation::ActiveModel {
            id: NotSet,
            concert_id: Set(r.concert_id),
            email: Set(r.email),
            quantity: Set(r.quantity),
            status: Set(ReservationStatus::Confirmed.as_str().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.txn)
        .await?;
        Ok(model_to_domain(model))
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.txn.commit().await?;
        Ok(())
    }
}
