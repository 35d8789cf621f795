//! Report handlers (public, read-only)

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{TopQuery, TotalReserved, MAX_TOP_LIMIT};
use crate::application::reporting::{
    ArtistPerformance, DayStats, FillStats, OccupancyRow, TopConcert, DEFAULT_TOP_LIMIT,
};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::state::AppState;
use crate::support::validations::clamp_limit;

#[utoipa::path(
    get,
    path = "/api/v1/reports/occupancy",
    tag = "Reports",
    responses((status = 200, description = "Seats per concert", body = ApiResponse<Vec<OccupancyRow>>))
)]
pub async fn occupancy(State(state): State<AppState>) -> ApiResult<Vec<OccupancyRow>> {
    Ok(Json(ApiResponse::success(state.reports.occupancy().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/top",
    tag = "Reports",
    params(TopQuery),
    responses((status = 200, description = "Most booked concerts", body = ApiResponse<Vec<TopConcert>>))
)]
pub async fn top_concerts(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Vec<TopConcert>> {
    let limit = clamp_limit(query.limit, DEFAULT_TOP_LIMIT as u64, MAX_TOP_LIMIT);
    Ok(Json(ApiResponse::success(
        state.reports.top(limit as usize).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/by-day",
    tag = "Reports",
    responses((status = 200, description = "Stats per UTC day", body = ApiResponse<Vec<DayStats>>))
)]
pub async fn by_day(State(state): State<AppState>) -> ApiResult<Vec<DayStats>> {
    Ok(Json(ApiResponse::success(state.reports.by_day().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/fill-rate",
    tag = "Reports",
    responses((status = 200, description = "Festival-wide fill rate", body = ApiResponse<FillStats>))
)]
pub async fn fill_rate(State(state): State<AppState>) -> ApiResult<FillStats> {
    Ok(Json(ApiResponse::success(state.reports.fill_rate().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/by-artist",
    tag = "Reports",
    responses((status = 200, description = "Artist performance, best first", body = ApiResponse<Vec<ArtistPerformance>>))
)]
pub async fn by_artist(State(state): State<AppState>) -> ApiResult<Vec<ArtistPerformance>> {
    Ok(Json(ApiResponse::success(state.reports.by_artist().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/total",
    tag = "Reports",
    responses((status = 200, description = "Confirmed seats across the festival", body = ApiResponse<TotalReserved>))
)]
pub async fn total_reserved(State(state): State<AppState>) -> ApiResult<TotalReserved> {
    let total_reserved = state.reports.total_reserved().await?;
    Ok(Json(ApiResponse::success(TotalReserved { total_reserved })))
}
