//! Artist handlers; writes are organizer-only

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ArtistDto, CreateArtistRequest, UpdateArtistRequest};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Organizer;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/artists",
    tag = "Artists",
    responses((status = 200, description = "Artists by name", body = ApiResponse<Vec<ArtistDto>>))
)]
pub async fn list_artists(State(state): State<AppState>) -> ApiResult<Vec<ArtistDto>> {
    let artists = state.artists.list().await?;
    Ok(Json(ApiResponse::success(
        artists.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/artists/{id}",
    tag = "Artists",
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist", body = ApiResponse<ArtistDto>),
        (status = 404, description = "Unknown artist")
    )
)]
pub async fn get_artist(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<ArtistDto> {
    let artist = state.artists.get(id).await?;
    Ok(Json(ApiResponse::success(artist.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/artists",
    tag = "Artists",
    security(("bearer_auth" = [])),
    request_body = CreateArtistRequest,
    responses(
        (status = 201, description = "Artist created", body = ApiResponse<ArtistDto>),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_artist(
    State(state): State<AppState>,
    _organizer: Organizer,
    ValidatedJson(req): ValidatedJson<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ArtistDto>>), ApiError> {
    let artist = state.artists.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(artist.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/artists/{id}",
    tag = "Artists",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Artist id")),
    request_body = UpdateArtistRequest,
    responses(
        (status = 200, description = "Artist updated", body = ApiResponse<ArtistDto>),
        (status = 404, description = "Unknown artist"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn update_artist(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateArtistRequest>,
) -> ApiResult<ArtistDto> {
    let artist = state.artists.update(id, req.into()).await?;
    Ok(Json(ApiResponse::success(artist.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/artists/{id}",
    tag = "Artists",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Artist deleted"),
        (status = 404, description = "Unknown artist"),
        (status = 409, description = "Artist still scheduled")
    )
)]
pub async fn delete_artist(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.artists.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
