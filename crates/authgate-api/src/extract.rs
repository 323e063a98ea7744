//! 검증된 JSON 본문 추출기.
//!
//! 본문 파싱 실패(Content-Type 누락, 필드 누락, 문법 오류)와 `validator`
//! 검증 실패를 모두 400 `VALIDATION_ERROR` 봉투로 돌려줍니다.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::error::ApiError;

/// `Json<T>` 파싱 후 `T::validate()`까지 통과한 요청 본문.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(validation_message(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    debug!(status = %rejection.status(), "Request body rejected");
    ApiError::Validation(rejection.body_text())
}

/// validator 에러를 한 줄 메시지로 변환합니다.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        response::IntoResponse,
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Greeting {
        #[validate(length(min = 1, max = 8, message = "name은 1-8자여야 합니다"))]
        name: String,
    }

    async fn greet(ValidatedJson(greeting): ValidatedJson<Greeting>) -> impl IntoResponse {
        greeting.name
    }

    fn app() -> Router {
        Router::new().route("/", post(greet))
    }

    async fn send(content_type: Option<&str>, body: &str) -> (StatusCode, serde_json::Value) {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let response = app()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = send(Some("application/json"), r#"{"name":"kim"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let (status, json) = send(Some("application/json"), "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "VALIDATION_ERROR");
        assert!(json["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let (status, json) = send(None, r#"{"name":"kim"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_syntax_error_is_validation_error() {
        let (status, json) = send(Some("application/json"), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_validator_failure_uses_field_message() {
        let (status, json) = send(Some("application/json"), r#"{"name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "name은 1-8자여야 합니다");
    }
}
