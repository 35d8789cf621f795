//! Parameter handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ParameterDto, SetParameterRequest};
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Organizer;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/parameters/{key}",
    tag = "Parameters",
    params(("key" = String, Path, description = "Parameter key, e.g. CANCEL_DEADLINE_HOURS")),
    responses(
        (status = 200, description = "Parameter", body = ApiResponse<ParameterDto>),
        (status = 404, description = "Unset parameter")
    )
)]
pub async fn get_parameter(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<ParameterDto> {
    Ok(Json(ApiResponse::success(state.parameters.get(&key).await?.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/parameters/{key}",
    tag = "Parameters",
    security(("bearer_auth" = [])),
    params(("key" = String, Path, description = "Parameter key")),
    request_body = SetParameterRequest,
    responses(
        (status = 200, description = "Parameter stored", body = ApiResponse<ParameterDto>),
        (status = 400, description = "Blank value")
    )
)]
pub async fn set_parameter(
    State(state): State<AppState>,
    _organizer: Organizer,
    Path(key): Path<String>,
    ValidatedJson(req): ValidatedJson<SetParameterRequest>,
) -> ApiResult<ParameterDto> {
    let parameter = state.parameters.set(&key, &req.value).await?;
    Ok(Json(ApiResponse::success(parameter.into())))
}
