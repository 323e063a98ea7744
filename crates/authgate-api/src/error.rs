//! API 응답 봉투와 에러 응답.
//!
//! 성공은 `{ success: true, data, message }`, 실패는
//! `{ success: false, error, message }` 형식으로 통일합니다.
//!
//! ```json
//! {
//!   "success": false,
//!   "error": "MISSING_CREDENTIAL",
//!   "message": "no token provided"
//! }
//! ```

use authgate_core::{LoginError, ProfileError, Rejection};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// 실패 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 항상 `false`
    pub success: bool,
    /// 짧은 에러 코드 (예: "MISSING_CREDENTIAL")
    pub error: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

/// 성공 응답 봉투.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 파이프라인 거부 (401/403/503)
    #[error("{0}")]
    Auth(Rejection),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// 요청 본문 검증 실패
    #[error("{0}")]
    Validation(String),
}

/// 핸들러 결과 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::Auth(rejection)
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(rejection) => status_from(rejection.status()),
            ApiError::Login(err) => status_from(err.status()),
            ApiError::Profile(err) => status_from(err.status()),
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Auth(rejection) => ErrorBody::new(rejection.code(), &rejection.reason),
            ApiError::Login(LoginError::InvalidCredentials) => {
                ErrorBody::new("AUTHENTICATION_FAILED", "invalid username or password")
            }
            // 내부 사유는 응답에 싣지 않습니다.
            ApiError::Login(err) => ErrorBody::new(err.code(), "login is temporarily unavailable"),
            ApiError::Profile(err) => ErrorBody::new(err.code(), err.to_string()),
            ApiError::Validation(message) => ErrorBody::new("VALIDATION_ERROR", message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authgate_core::AuthError;

    #[test]
    fn test_rejection_statuses() {
        let cases = [
            (AuthError::MissingCredential, StatusCode::UNAUTHORIZED),
            (AuthError::Expired, StatusCode::UNAUTHORIZED),
            (AuthError::WrongRole, StatusCode::FORBIDDEN),
            (AuthError::StoreUnavailable, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            let err = ApiError::from(Rejection::new(error, "reason"));
            assert_eq!(err.status(), expected);
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::from(Rejection::new(AuthError::WrongRole, "insufficient role"));
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "INSUFFICIENT_ROLE");
        assert_eq!(json["message"], "insufficient role");
    }

    #[test]
    fn test_login_and_profile_errors() {
        let err = ApiError::from(LoginError::InvalidCredentials);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.body().error, "AUTHENTICATION_FAILED");

        let err = ApiError::from(ProfileError::Conflict);
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = ApiError::Validation("username: 1-64자여야 합니다".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_response_skips_empty_message() {
        let json = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("message").is_none());
    }
}
