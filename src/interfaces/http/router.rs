//! API router with Swagger UI

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::modules::{
    artists, auth, concerts, health, metrics, parameters, reports, request_id, reservations,
    stages,
};
use super::state::AppState;
use crate::application::reporting::{ArtistPerformance, DayStats, FillStats, OccupancyRow, TopConcert};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Organizer JWT from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::me,
        artists::list_artists,
        artists::get_artist,
        artists::create_artist,
        artists::update_artist,
        artists::delete_artist,
        stages::list_stages,
        stages::get_stage,
        stages::create_stage,
        stages::update_stage,
        stages::delete_stage,
        concerts::list_concerts,
        concerts::get_concert,
        concerts::programming,
        concerts::create_concert,
        concerts::update_concert,
        concerts::set_concert_status,
        concerts::delete_concert,
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::cancel_reservation,
        parameters::get_parameter,
        parameters::set_parameter,
        reports::occupancy,
        reports::top_concerts,
        reports::by_day,
        reports::fill_rate,
        reports::by_artist,
        reports::total_reserved,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            artists::ArtistDto,
            artists::CreateArtistRequest,
            artists::UpdateArtistRequest,
            stages::StageDto,
            stages::CreateStageRequest,
            stages::UpdateStageRequest,
            concerts::ConcertDto,
            concerts::ConcertDetailsDto,
            concerts::CreateConcertRequest,
            concerts::UpdateConcertRequest,
            concerts::ConcertStatusRequest,
            reservations::ReservationDto,
            reservations::CreateReservationRequest,
            parameters::ParameterDto,
            parameters::SetParameterRequest,
            reports::TotalReserved,
            OccupancyRow,
            TopConcert,
            FillStats,
            DayStats,
            ArtistPerformance,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database connectivity"),
        (name = "Authentication", description = "Account registration and JWT login"),
        (name = "Artists", description = "Artist catalog; writes need the organizer role"),
        (name = "Stages", description = "Stages and their capacities; writes need the organizer role"),
        (name = "Concerts", description = "Festival schedule with live seat counts"),
        (name = "Reservations", description = "Seat admission and cancellation"),
        (name = "Parameters", description = "Booking policy parameters such as CANCEL_DEADLINE_HOURS"),
        (name = "Reports", description = "Occupancy and fill-rate reports"),
    ),
    info(
        title = "Festival Booking API",
        version = "1.0.0",
        description = "Concert schedule, seat reservations and festival reports",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route(
            "/artists",
            get(artists::list_artists).post(artists::create_artist),
        )
        .route(
            "/artists/{id}",
            get(artists::get_artist)
                .put(artists::update_artist)
                .delete(artists::delete_artist),
        )
        .route("/stages", get(stages::list_stages).post(stages::create_stage))
        .route(
            "/stages/{id}",
            get(stages::get_stage)
                .put(stages::update_stage)
                .delete(stages::delete_stage),
        )
        .route(
            "/concerts",
            get(concerts::list_concerts).post(concerts::create_concert),
        )
        .route(
            "/concerts/{id}",
            get(concerts::get_concert)
                .put(concerts::update_concert)
                .delete(concerts::delete_concert),
        )
        .route("/concerts/{id}/status", put(concerts::set_concert_status))
        .route("/programming", get(concerts::programming))
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(reservations::get_reservation).delete(reservations::cancel_reservation),
        )
        .route(
            "/parameters/{key}",
            get(parameters::get_parameter).put(parameters::set_parameter),
        )
        .route("/reports/occupancy", get(reports::occupancy))
        .route("/reports/top", get(reports::top_concerts))
        .route("/reports/by-day", get(reports::by_day))
        .route("/reports/fill-rate", get(reports::fill_rate))
        .route("/reports/by-artist", get(reports::by_artist))
        .route("/reports/total", get(reports::total_reserved))
}

/// Build the full HTTP surface. `/metrics` is mounted only when a Prometheus
/// recorder handle is supplied.
pub fn create_api_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
