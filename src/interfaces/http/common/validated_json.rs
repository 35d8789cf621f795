//! JSON body extractor that also runs `validator` rules
//!
//! Malformed JSON is a 400; a body that parses but breaks a field rule is a
//! 422 listing every failing field. Both use the `ApiResponse` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` plus `T::validate()`.
///
/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreateStageRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` pairs, sorted by field so output is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {rejection}"));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let body = ApiResponse::<()>::error(describe(&errors));
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct StageBody {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1, message = "capacity must be at least 1"))]
        capacity: i32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<StageBody>) -> String {
        format!("{}:{}", body.name, body.capacity)
    }

    async fn post_json(raw: &str) -> Response {
        let app = Router::new().route("/stages", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/stages")
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let resp = post_json(r#"{"name":"Main","capacity":500}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Main:500");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = post_json("{nope").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rule_violations_are_422_and_listed() {
        let resp = post_json(r#"{"name":"","capacity":0}"#).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["error"],
            "capacity: capacity must be at least 1; name: name is required"
        );
    }
}
