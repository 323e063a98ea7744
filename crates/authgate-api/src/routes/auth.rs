//! 로그인/로그아웃 endpoint.
//!
//! 로그인에 성공하면 토큰을 본문과 `token` 쿠키로 함께 돌려줍니다.
//! 로그아웃은 쿠키만 지우며, 이미 발급된 토큰은 만료 전까지 유효합니다.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use authgate_core::{LoginError, PublicIdentity};

use crate::auth::{clear_session_cookie, session_cookie};
use crate::error::{ApiResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::metrics::record_login_attempt;
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "username은 1-64자여야 합니다"))]
    pub username: String,
    #[validate(length(min = 1, max = 256, message = "password는 1-256자여야 합니다"))]
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicIdentity,
    /// 토큰 유효 시간 (초)
    pub expires_in: i64,
}

/// 로그아웃 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// 쿠키 삭제 여부
    pub cookie_cleared: bool,
    /// 기존 토큰이 계속 유효한지 여부 (서버 측 폐기 목록 없음)
    pub token_still_valid_until_expiry: bool,
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome = match state
        .authenticator
        .login(&request.username, &request.password)
        .await
    {
        Ok(outcome) => {
            record_login_attempt("success");
            outcome
        }
        Err(err) => {
            record_login_attempt(match err {
                LoginError::InvalidCredentials => "invalid_credentials",
                _ => "error",
            });
            return Err(err.into());
        }
    };

    let cookie = session_cookie(
        &outcome.token,
        outcome.expires_in_secs,
        state.auth_config.cookie_secure,
    );
    let body = LoginResponse {
        token: outcome.token,
        user: outcome.identity.public(),
        expires_in: outcome.expires_in_secs,
    };

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::with_message(body, "login successful")),
    ))
}

/// POST /api/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.auth_config.cookie_secure),
        )],
        Json(ApiResponse::with_message(
            LogoutResponse {
                cookie_cleared: true,
                token_still_valid_until_expiry: true,
            },
            "logged out; previously issued tokens remain valid until they expire",
        )),
    )
}

/// 로그인/로그아웃 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}
