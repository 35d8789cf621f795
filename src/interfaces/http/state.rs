//! Handler state shared by every route

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::application::{
    ArtistService, BookingConfig, BookingService, ConcertService, ParameterService,
    ReportService, StageService, UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::middleware::AuthState;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
    pub auth: AuthState,
    pub artists: Arc<ArtistService>,
    pub stages: Arc<StageService>,
    pub concerts: Arc<ConcertService>,
    pub parameters: Arc<ParameterService>,
    pub booking: Arc<BookingService>,
    pub reports: Arc<ReportService>,
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire every service over one repository provider. Booking and concert
    /// scheduling share a single capacity ledger.
    pub fn new(
        db: DatabaseConnection,
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        booking: BookingConfig,
    ) -> Self {
        let booking = Arc::new(BookingService::new(repos.clone(), booking));
        let ledger = booking.ledger().clone();

        Self {
            db,
            started_at: Arc::new(Instant::now()),
            auth: AuthState {
                jwt_config: jwt_config.clone(),
            },
            artists: Arc::new(ArtistService::new(repos.clone())),
            stages: Arc::new(StageService::new(repos.clone())),
            concerts: Arc::new(ConcertService::new(repos.clone(), ledger)),
            parameters: Arc::new(ParameterService::new(repos.clone())),
            reports: Arc::new(ReportService::new(repos.clone())),
            users: Arc::new(UserService::new(repos, jwt_config)),
            booking,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}
