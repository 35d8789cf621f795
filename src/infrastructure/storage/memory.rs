//! In-memory storage for development and testing
//!
//! Implements every repository on `DashMap`s. The admission scope buffers
//! its insert until commit but does not isolate itself from other writers;
//! mutual exclusion per concert comes from the capacity ledger's locks.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{
    overlaps, AdmissionScope, Artist, ArtistRepository, Concert, ConcertDetails, ConcertDraft,
    ConcertFilter, ConcertRepository, ConcertStatus, DomainError, DomainResult, NewReservation,
    NewUser, Parameter, ParameterRepository, RepositoryProvider, Reservation,
    ReservationRepository, ReservationStatus, Stage, StageRepository, User, UserRepository,
};

#[derive(Default)]
struct MemoryState {
    artists: DashMap<i32, Artist>,
    stages: DashMap<i32, Stage>,
    concerts: DashMap<i32, Concert>,
    reservations: DashMap<i32, Reservation>,
    parameters: DashMap<String, String>,
    users: DashMap<i32, User>,
    artist_counter: AtomicI32,
    stage_counter: AtomicI32,
    concert_counter: AtomicI32,
    reservation_counter: AtomicI32,
    user_counter: AtomicI32,
}

impl MemoryState {
    fn next_id(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn confirmed_for(&self, concert_id: i32) -> impl Iterator<Item = Reservation> + '_ {
        self.reservations
            .iter()
            .filter(move |r| r.concert_id == concert_id && r.is_confirmed())
            .map(|r| r.clone())
    }

    fn reserved(&self, concert_id: i32) -> i64 {
        self.confirmed_for(concert_id)
            .map(|r| i64::from(r.quantity))
            .sum()
    }

    fn details(&self, concert: Concert) -> ConcertDetails {
        let artist_name = self
            .artists
            .get(&concert.artist_id)
            .map(|a| a.name.clone())
            .unwrap_or_default();
        let (stage_name, stage_capacity) = self
            .stages
            .get(&concert.stage_id)
            .map(|s| (s.name.clone(), s.capacity))
            .unwrap_or_default();
        ConcertDetails {
            reserved: self.reserved(concert.id),
            concert,
            artist_name,
            stage_name,
            stage_capacity,
        }
    }
}

fn newest_first(mut rows: Vec<Reservation>) -> Vec<Reservation> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

/// In-memory implementation of [`RepositoryProvider`]
pub struct InMemoryStore {
    artists: MemoryArtistRepository,
    stages: MemoryStageRepository,
    concerts: MemoryConcertRepository,
    reservations: MemoryReservationRepository,
    parameters: MemoryParameterRepository,
    users: MemoryUserRepository,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let state = Arc::new(MemoryState::default());
        Self {
            artists: MemoryArtistRepository(state.clone()),
            stages: MemoryStageRepository(state.clone()),
            concerts: MemoryConcertRepository(state.clone()),
            reservations: MemoryReservationRepository(state.clone()),
            parameters: MemoryParameterRepository(state.clone()),
            users: MemoryUserRepository(state),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStore {
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

// ── Artists ─────────────────────────────────────────────────────

struct MemoryArtistRepository(Arc<MemoryState>);

#[async_trait]
impl ArtistRepository for MemoryArtistRepository {
    async fn find_all(&self) -> DomainResult<Vec<Artist>> {
        let mut all: Vec<_> = self.0.artists.iter().map(|a| a.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Artist>> {
        Ok(self.0.artists.get(&id).map(|a| a.clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Artist>> {
        Ok(self
            .0
            .artists
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.clone()))
    }

    async fn create(&self, mut artist: Artist) -> DomainResult<Artist> {
        artist.id = MemoryState::next_id(&self.0.artist_counter);
        self.0.artists.insert(artist.id, artist.clone());
        Ok(artist)
    }

    async fn update(&self, artist: Artist) -> DomainResult<Artist> {
        match self.0.artists.get_mut(&artist.id) {
            Some(mut stored) => {
                *stored = artist.clone();
                Ok(artist)
            }
            None => Err(DomainError::not_found("Artist", "id", artist.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self.0.artists.remove(&id).is_some())
    }
}

// ── Stages ──────────────────────────────────────────────────────

struct MemoryStageRepository(Arc<MemoryState>);

#[async_trait]
impl StageRepository for MemoryStageRepository {
    async fn find_all(&self) -> DomainResult<Vec<Stage>> {
        let mut all: Vec<_> = self.0.stages.iter().map(|s| s.clone()).collect();
        all.sort_by(|a, b| b.capacity.cmp(&a.capacity).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Stage>> {
        Ok(self.0.stages.get(&id).map(|s| s.clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Stage>> {
        Ok(self
            .0
            .stages
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.clone()))
    }

    async fn create(&self, mut stage: Stage) -> DomainResult<Stage> {
        stage.id = MemoryState::next_id(&self.0.stage_counter);
        self.0.stages.insert(stage.id, stage.clone());
        Ok(stage)
    }

    async fn update(&self, stage: Stage) -> DomainResult<Stage> {
        match self.0.stages.get_mut(&stage.id) {
            Some(mut stored) => {
                *stored = stage.clone();
                Ok(stage)
            }
            None => Err(DomainError::not_found("Stage", "id", stage.id)),
        }
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self.0.stages.remove(&id).is_some())
    }
}

// ── Concerts ────────────────────────────────────────────────────

struct MemoryConcertRepository(Arc<MemoryState>);

#[async_trait]
impl ConcertRepository for MemoryConcertRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Concert>> {
        Ok(self.0.concerts.get(&id).map(|c| c.clone()))
    }

    async fn find_details(&self, filter: &ConcertFilter) -> DomainResult<Vec<ConcertDetails>> {
        let mut concerts: Vec<_> = self
            .0
            .concerts
            .iter()
            .filter(|c| filter.matches(c))
            .map(|c| c.clone())
            .collect();
        concerts.sort_by(|a, b| a.start_at.cmp(&b.start_at).then(a.id.cmp(&b.id)));
        Ok(concerts.into_iter().map(|c| self.0.details(c)).collect())
    }

    async fn find_details_by_id(&self, id: i32) -> DomainResult<Option<ConcertDetails>> {
        let concert = self.0.concerts.get(&id).map(|c| c.clone());
        Ok(concert.map(|c| self.0.details(c)))
    }

    async fn find_overlap(
        &self,
        stage_id: i32,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        exclude_id: Option<i32>,
    ) -> DomainResult<Option<Concert>> {
        Ok(self
            .0
            .concerts
            .iter()
            .find(|c| {
                c.stage_id == stage_id
                    && Some(c.id) != exclude_id
                    && overlaps(start_at, end_at, c)
            })
            .map(|c| c.clone()))
    }

    async fn create(&self, draft: ConcertDraft) -> DomainResult<Concert> {
        let concert = Concert {
            id: MemoryState::next_id(&self.0.concert_counter),
            stage_id: draft.stage_id,
            artist_id: draft.artist_id,
            start_at: draft.start_at,
            end_at: draft.end_at,
            max_capacity: draft.max_capacity,
            status: ConcertStatus::Scheduled,
        };
        self.0.concerts.insert(concert.id, concert.clone());
        Ok(concert)
    }

    async fn update(&self, id: i32, draft: ConcertDraft) -> DomainResult<Option<Concert>> {
        Ok(self.0.concerts.get_mut(&id).map(|mut c| {
            c.stage_id = draft.stage_id;
            c.artist_id = draft.artist_id;
            c.start_at = draft.start_at;
            c.end_at = draft.end_at;
            c.max_capacity = draft.max_capacity;
            c.clone()
        }))
    }

    async fn update_status(&self, id: i32, status: ConcertStatus) -> DomainResult<Option<Concert>> {
        Ok(self.0.concerts.get_mut(&id).map(|mut c| {
            c.status = status;
            c.clone()
        }))
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let removed = self.0.concerts.remove(&id).is_some();
        if removed {
            self.0.reservations.retain(|_, r| r.concert_id != id);
        }
        Ok(removed)
    }
}

// ── Reservations ────────────────────────────────────────────────

struct MemoryReservationRepository(Arc<MemoryState>);

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.0.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(newest_first(
            self.0.reservations.iter().map(|r| r.clone()).collect(),
        ))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Vec<Reservation>> {
        Ok(newest_first(
            self.0
                .reservations
                .iter()
                .filter(|r| r.email == email)
                .map(|r| r.clone())
                .collect(),
        ))
    }

    async fn update_status(&self, id: i32, status: ReservationStatus) -> DomainResult<()> {
        match self.0.reservations.get_mut(&id) {
            Some(mut r) => {
                r.status = status;
                Ok(())
            }
            None => Err(DomainError::ReservationNotFound(id)),
        }
    }

    async fn sum_confirmed_quantity(&self, concert_id: i32) -> DomainResult<i64> {
        Ok(self.0.reserved(concert_id))
    }

    async fn begin_admission(&self, concert_id: i32) -> DomainResult<Box<dyn AdmissionScope>> {
        Ok(Box::new(MemoryAdmissionScope {
            concert: self.0.concerts.get(&concert_id).map(|c| c.clone()),
            state: self.0.clone(),
            concert_id,
            pending: None,
        }))
    }
}

struct MemoryAdmissionScope {
    state: Arc<MemoryState>,
    concert_id: i32,
    concert: Option<Concert>,
    pending: Option<Reservation>,
}

#[async_trait]
impl AdmissionScope for MemoryAdmissionScope {
    fn concert(&self) -> Option<&Concert> {
        self.concert.as_ref()
    }

    async fn find_confirmed(&mut self, email: &str) -> DomainResult<Option<Reservation>> {
        if let Some(pending) = self.pending.as_ref().filter(|r| r.email == email) {
            return Ok(Some(pending.clone()));
        }
        Ok(self
            .state
            .confirmed_for(self.concert_id)
            .find(|r| r.email == email))
    }

    async fn sum_confirmed_quantity(&mut self) -> DomainResult<i64> {
        let pending = self.pending.as_ref().map_or(0, |r| i64::from(r.quantity));
        Ok(self.state.reserved(self.concert_id) + pending)
    }

    async fn insert(&mut self, reservation: NewReservation) -> DomainResult<Reservation> {
        if self.pending.is_some() {
            return Err(DomainError::Storage(
                "admission scope already holds an insert".into(),
            ));
        }
        let id = MemoryState::next_id(&self.state.reservation_counter);
        let row = reservation.confirm(id, Utc::now());
        self.pending = Some(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        if let Some(row) = self.pending {
            self.state.reservations.insert(row.id, row);
        }
        Ok(())
    }
}

// ── Parameters ──────────────────────────────────────────────────

struct MemoryParameterRepository(Arc<MemoryState>);

#[async_trait]
impl ParameterRepository for MemoryParameterRepository {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.0.parameters.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<Parameter> {
        self.0.parameters.insert(key.to_string(), value.to_string());
        Ok(Parameter {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

// ── Users ───────────────────────────────────────────────────────

struct MemoryUserRepository(Arc<MemoryState>);

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> DomainResult<User> {
        if self.0.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already exists".into()));
        }
        let user = User {
            id: MemoryState::next_id(&self.0.user_counter),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        self.0.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .0
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.0.users.get(&id).map(|u| u.clone()))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.0.users.len() as u64)
    }
}
