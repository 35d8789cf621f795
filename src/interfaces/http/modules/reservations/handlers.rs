//! Reservation handlers
//!
//! Reservations are keyed by email, so these routes need no token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateReservationRequest, ReservationDto, ReservationQuery};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid email or quantity"),
        (status = 404, description = "Unknown concert"),
        (status = 409, description = "Duplicate reservation, or not enough seats (`data.remaining`)"),
        (status = 503, description = "Concert busy, retry after the `Retry-After` delay")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .booking
        .request(req.concert_id, &req.email, req.quantity)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations, newest first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Malformed email filter")
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.booking.list(query.email.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Unknown reservation")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    Ok(Json(ApiResponse::success(state.booking.get(id).await?.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Cancellation deadline passed"),
        (status = 404, description = "Unknown reservation"),
        (status = 409, description = "Already cancelled"),
        (status = 503, description = "Concert busy")
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.booking.cancel(id).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
