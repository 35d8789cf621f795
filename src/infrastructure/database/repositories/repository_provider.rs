//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    ArtistRepository, ConcertRepository, ParameterRepository, RepositoryProvider,
    ReservationRepository, StageRepository, UserRepository,
};

use super::artist_repository::SeaOrmArtistRepository;
use super::concert_repository::SeaOrmConcertRepository;
use super::parameter_repository::SeaOrmParameterRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::stage_repository::SeaOrmStageRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let concert = repos.concerts().find_by_id(1).await?;
/// let seats = repos.reservations().sum_confirmed_quantity(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    artists: SeaOrmArtistRepository,
    stages: SeaOrmStageRepository,
    concerts: SeaOrmConcertRepository,
    reservations: SeaOrmReservationRepository,
    parameters: SeaOrmParameterRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            artists: SeaOrmArtistRepository::new(db.clone()),
            stages: SeaOrmStageRepository::new(db.clone()),
            concerts: SeaOrmConcertRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            parameters: SeaOrmParameterRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn artists(&self) -> &dyn ArtistRepository {
        &self.artists
    }

    fn stages(&self) -> &dyn StageRepository {
        &self.stages
    }

    fn concerts(&self) -> &dyn ConcertRepository {
        &self.concerts
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn parameters(&self) -> &dyn ParameterRepository {
        &self.parameters
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use chrono::{Duration, Utc};
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::application::booking::{BookingConfig, BookingService};
    use crate::domain::{
        AdmissionScope, Artist, ConcertDraft, ConcertFilter, DomainError, NewReservation, NewUser,
        ReservationStatus, Stage, UserRole, CANCEL_DEADLINE_HOURS,
    };
    use crate::infrastructure::database::migrator::Migrator;

    async fn provider() -> Arc<SeaOrmRepositoryProvider> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(SeaOrmRepositoryProvider::new(db))
    }

    async fn seed_concert(repos: &SeaOrmRepositoryProvider, hours_ahead: i64, capacity: i32) -> i32 {
        let stage = repos
            .stages()
            .create(Stage { id: 0, name: format!("Stage {hours_ahead}"), capacity: 1000 })
            .await
            .unwrap();
        let artist = repos
            .artists()
            .create(Artist {
                id: 0,
                name: format!("Artist {hours_ahead}"),
                genre: Some("jazz".into()),
                bio_short: None,
                links: None,
            })
            .await
            .unwrap();
        let start = Utc::now() + Duration::hours(hours_ahead);
        repos
            .concerts()
            .create(ConcertDraft {
                stage_id: stage.id,
                artist_id: artist.id,
                start_at: start,
                end_at: start + Duration::hours(2),
                max_capacity: capacity,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn admission_scope_rolls_back_on_drop() {
        let repos = provider().await;
        let id = seed_concert(&repos, 48, 10).await;

        {
            let mut scope = repos.reservations().begin_admission(id).await.unwrap();
            assert_eq!(scope.concert().map(|c| c.max_capacity), Some(10));
            scope
                .insert(NewReservation {
                    concert_id: id,
                    email: "a@fest.io".into(),
                    quantity: 4,
                })
                .await
                .unwrap();
            assert_eq!(scope.sum_confirmed_quantity().await.unwrap(), 4);
        }

        assert_eq!(repos.reservations().sum_confirmed_quantity(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn booking_flow_against_sqlite() {
        let repos = provider().await;
        let id = seed_concert(&repos, 48, 100).await;
        let booking = BookingService::new(repos.clone(), BookingConfig::default());

        booking.request(id, "a@fest.io", 60).await.unwrap();
        assert_eq!(
            booking.request(id, "b@fest.io", 50).await.unwrap_err(),
            DomainError::InsufficientCapacity { remaining: 40 }
        );
        let last = booking.request(id, "c@fest.io", 40).await.unwrap();
        assert!(matches!(
            booking.request(id, "A@fest.io", 1).await.unwrap_err(),
            DomainError::DuplicateReservation { .. }
        ));

        repos.parameters().set(CANCEL_DEADLINE_HOURS, "24").await.unwrap();
        let cancelled = booking.cancel(last.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        let details = repos.concerts().find_details_by_id(id).await.unwrap().unwrap();
        assert_eq!(details.reserved, 60);
        assert_eq!(details.remaining(), 40);
        assert_eq!(details.artist_name, "Artist 48");
    }

    #[tokio::test]
    async fn cancellation_inside_deadline_is_refused() {
        let repos = provider().await;
        let id = seed_concert(&repos, 10, 100).await;
        let booking = BookingService::new(repos.clone(), BookingConfig::default());
        repos.parameters().set(CANCEL_DEADLINE_HOURS, "24").await.unwrap();

        let r = booking.request(id, "a@fest.io", 1).await.unwrap();
        assert_eq!(booking.cancel(r.id).await.unwrap_err(), DomainError::DeadlinePassed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_admissions_respect_capacity() {
        let repos = provider().await;
        let id = seed_concert(&repos, 48, 5).await;
        let booking = Arc::new(BookingService::new(
            repos.clone(),
            BookingConfig {
                lock_timeout: StdDuration::from_secs(10),
                ..BookingConfig::default()
            },
        ));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let booking = booking.clone();
                tokio::spawn(async move { booking.request(id, &format!("f{i}@fest.io"), 1).await })
            })
            .collect();

        let mut admitted = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => admitted += 1,
                Err(e) => assert_eq!(e, DomainError::InsufficientCapacity { remaining: 0 }),
            }
        }
        assert_eq!(admitted, 5);
        assert_eq!(repos.reservations().sum_confirmed_quantity(id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn day_filter_and_overlap_queries() {
        let repos = provider().await;
        let id = seed_concert(&repos, 48, 10).await;
        let concert = repos.concerts().find_by_id(id).await.unwrap().unwrap();

        let same_day = ConcertFilter {
            day: Some(concert.start_at.date_naive()),
            stage_id: Some(concert.stage_id),
        };
        assert_eq!(repos.concerts().find_details(&same_day).await.unwrap().len(), 1);

        let overlap = repos
            .concerts()
            .find_overlap(
                concert.stage_id,
                concert.start_at + Duration::minutes(30),
                concert.end_at + Duration::hours(1),
                None,
            )
            .await
            .unwrap();
        assert_eq!(overlap.map(|c| c.id), Some(id));

        let excluded = repos
            .concerts()
            .find_overlap(concert.stage_id, concert.start_at, concert.end_at, Some(id))
            .await
            .unwrap();
        assert!(excluded.is_none());
    }

    #[tokio::test]
    async fn parameters_upsert_and_users() {
        let repos = provider().await;
        repos.parameters().set("K", "1").await.unwrap();
        repos.parameters().set("K", "2").await.unwrap();
        assert_eq!(repos.parameters().get("K").await.unwrap().as_deref(), Some("2"));

        let user = repos
            .users()
            .create(NewUser {
                email: "boss@fest.io".into(),
                password_hash: "hash".into(),
                role: UserRole::Organizer,
            })
            .await
            .unwrap();
        assert_eq!(repos.users().count().await.unwrap(), 1);
        let found = repos.users().find_by_email("boss@fest.io").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, UserRole::Organizer);
    }
}
