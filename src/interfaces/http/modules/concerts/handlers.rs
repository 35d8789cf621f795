//! Concert handlers
//!
//! Reads are public; scheduling changes need the organizer role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ConcertDetailsDto, ConcertDto, ConcertQuery, ConcertStatusRequest, CreateConcertRequest,
    UpdateConcertRequest,
};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Organizer;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/concerts",
    tag = "Concerts",
    params(ConcertQuery),
    responses(
        (status = 200, description = "Concerts by start time", body = ApiResponse<Vec<ConcertDetailsDto>>),
        (status = 400, description = "Malformed day")
    )
)]
pub async fn list_concerts(
    State(state): State<AppState>,
    Query(query): Query<ConcertQuery>,
) -> ApiResult<Vec<ConcertDetailsDto>> {
    let filter = query.into_filter()?;
    let concerts = state.concerts.list(&filter).await?;
    Ok(Json(ApiResponse::success(
        concerts.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    params(("id" = i32, Path, description = "Concert id")),
    responses(
        (status = 200, description = "Concert with seat counts", body = ApiResponse<ConcertDetailsDto>),
        (status = 404, description = "Unknown concert")
    )
)]
pub async fn get_concert(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ConcertDetailsDto> {
    Ok(Json(ApiResponse::success(state.concerts.details(id).await?.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/programming",
    tag = "Concerts",
    responses((status = 200, description = "Concerts with seats left", body = ApiResponse<Vec<ConcertDetailsDto>>))
)]
pub async fn programming(State(state): State<AppState>) -> ApiResult<Vec<ConcertDetailsDto>> {
    let concerts = state.concerts.programming().await?;
    Ok(Json(ApiResponse::success(
        concerts.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/concerts",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    request_body = CreateConcertRequest,
    responses(
        (status = 201, description = "Concert scheduled", body = ApiResponse<ConcertDto>),
        (status = 400, description = "Invalid times, capacity or references"),
        (status = 409, description = "Overlaps another concert on the stage")
    )
)]
pub async fn create_concert(
    State(state): State<AppState>,
    _organizer: Organizer,
    ValidatedJson(req): ValidatedJson<CreateConcertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConcertDto>>), ApiError> {
    let concert = state.concerts.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(concert.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Concert id")),
    request_body = UpdateConcertRequest,
    responses(
        (status = 200, description = "Concert updated", body = ApiResponse<ConcertDto>),
        (status = 404, description = "Unknown concert"),
        (status = 409, description = "Overlap, or capacity below reserved seats")
    )
)]
pub async fn update_concert(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateConcertRequest>,
) -> ApiResult<ConcertDto> {
    let concert = state.concerts.update(id, req.into()).await?;
    Ok(Json(ApiResponse::success(concert.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/concerts/{id}/status",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Concert id")),
    request_body = ConcertStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ConcertDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Unknown concert")
    )
)]
pub async fn set_concert_status(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<ConcertStatusRequest>,
) -> ApiResult<ConcertDto> {
    let status = req.parse()?;
    let concert = state.concerts.set_status(id, status).await?;
    Ok(Json(ApiResponse::success(concert.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/concerts/{id}",
    tag = "Concerts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Concert id")),
    responses(
        (status = 200, description = "Concert deleted"),
        (status = 404, description = "Unknown concert"),
        (status = 409, description = "Seats are still reserved")
    )
)]
pub async fn delete_concert(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.concerts.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
