//! Mapping of domain errors onto HTTP responses

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Seconds a client should wait before retrying a `Busy` concert.
pub const BUSY_RETRY_AFTER_SECS: u64 = 1;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Handler error: a domain error rendered through the `ApiResponse` envelope.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::ConcertNotFound(_)
            | DomainError::ReservationNotFound(_)
            | DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::DuplicateReservation { .. }
            | DomainError::InsufficientCapacity { .. }
            | DomainError::AlreadyCancelled(_)
            | DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::DeadlinePassed | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Busy(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.0 {
            DomainError::InsufficientCapacity { remaining } => {
                let message = self.0.to_string();
                let body = ApiResponse::error_with(message, json!({ "remaining": remaining }));
                (status, Json(body)).into_response()
            }
            DomainError::Busy(_) => {
                let body = ApiResponse::<()>::error(self.0.to_string());
                (
                    status,
                    [(header::RETRY_AFTER, BUSY_RETRY_AFTER_SECS.to_string())],
                    Json(body),
                )
                    .into_response()
            }
            DomainError::Storage(ref detail) => {
                error!(error = %detail, "Request failed on storage");
                let body = ApiResponse::<()>::error("Internal storage error");
                (status, Json(body)).into_response()
            }
            ref other => {
                let body = ApiResponse::<()>::error(other.to_string());
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(e: DomainError) -> (StatusCode, Response) {
        let resp = ApiError(e).into_response();
        (resp.status(), resp)
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::ConcertNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::ReservationNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::not_found("Stage", "id", 3), StatusCode::NOT_FOUND),
            (
                DomainError::DuplicateReservation {
                    concert_id: 1,
                    email: "a@b.c".into(),
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::AlreadyCancelled(1), StatusCode::CONFLICT),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::DeadlinePassed, StatusCode::BAD_REQUEST),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[tokio::test]
    async fn insufficient_capacity_carries_remaining() {
        let (status, resp) = render(DomainError::InsufficientCapacity { remaining: 40 }).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["remaining"], 40);
    }

    #[tokio::test]
    async fn busy_sets_retry_after() {
        let (status, resp) = render(DomainError::Busy(7)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()[header::RETRY_AFTER], "1");
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let (_, resp) = render(DomainError::Storage("password=hunter2".into())).await;
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("hunter2"));
    }
}
