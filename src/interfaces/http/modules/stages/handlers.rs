//! Stage handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateStageRequest, StageDto, UpdateStageRequest};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Organizer;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/stages",
    tag = "Stages",
    responses((status = 200, description = "Stages, largest first", body = ApiResponse<Vec<StageDto>>))
)]
pub async fn list_stages(State(state): State<AppState>) -> ApiResult<Vec<StageDto>> {
    let stages = state.stages.list().await?;
    Ok(Json(ApiResponse::success(
        stages.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stages/{id}",
    tag = "Stages",
    params(("id" = i32, Path, description = "Stage id")),
    responses(
        (status = 200, description = "Stage", body = ApiResponse<StageDto>),
        (status = 404, description = "Unknown stage")
    )
)]
pub async fn get_stage(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<StageDto> {
    Ok(Json(ApiResponse::success(state.stages.get(id).await?.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/stages",
    tag = "Stages",
    security(("bearer_auth" = [])),
    request_body = CreateStageRequest,
    responses(
        (status = 201, description = "Stage created", body = ApiResponse<StageDto>),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_stage(
    State(state): State<AppState>,
    _organizer: Organizer,
    ValidatedJson(req): ValidatedJson<CreateStageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StageDto>>), ApiError> {
    let stage = state.stages.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(stage.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/stages/{id}",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Stage id")),
    request_body = UpdateStageRequest,
    responses(
        (status = 200, description = "Stage updated", body = ApiResponse<StageDto>),
        (status = 404, description = "Unknown stage"),
        (status = 409, description = "Name taken or capacity below a hosted concert")
    )
)]
pub async fn update_stage(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateStageRequest>,
) -> ApiResult<StageDto> {
    let stage = state.stages.update(id, req.into()).await?;
    Ok(Json(ApiResponse::success(stage.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stages/{id}",
    tag = "Stages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Stage id")),
    responses(
        (status = 200, description = "Stage deleted"),
        (status = 404, description = "Unknown stage"),
        (status = 409, description = "Stage still hosts concerts")
    )
)]
pub async fn delete_stage(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.stages.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}
