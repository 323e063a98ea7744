//! 게이트 시연 endpoint.
//!
//! - `GET /api/public`: OptionalGate
//! - `GET /api/protected`: RoleGate(admin)
//! - `GET /api/protected/secret-demo`: 레거시 시크릿 + RoleGate(admin)

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use authgate_core::PublicIdentity;

use crate::auth::{AdminAuth, OptionalAuth, SecretAuth};
use crate::error::ApiResponse;
use crate::state::AppState;

/// 공개 endpoint 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicResponse {
    pub greeting: String,
    pub authenticated: bool,
    pub user: Option<PublicIdentity>,
}

/// 보호된 endpoint 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub user: PublicIdentity,
    pub strategy: String,
}

/// 레거시 시크릿 시연 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct SecretDemoResponse {
    pub user: PublicIdentity,
    pub strategy: String,
    /// 서명 토큰과 비교한 약점
    pub weaknesses: Vec<String>,
}

/// GET /api/public
pub async fn public(OptionalAuth(identity): OptionalAuth) -> Json<ApiResponse<PublicResponse>> {
    let greeting = match &identity {
        Some(identity) => format!("Hello, {}!", identity.username),
        None => "Hello, anonymous visitor!".to_string(),
    };

    Json(ApiResponse::ok(PublicResponse {
        greeting,
        authenticated: identity.is_some(),
        user: identity.map(|i| i.public()),
    }))
}

/// GET /api/protected
pub async fn protected(AdminAuth(identity): AdminAuth) -> Json<ApiResponse<ProtectedResponse>> {
    Json(ApiResponse::with_message(
        ProtectedResponse {
            user: identity.public(),
            strategy: "jwt".to_string(),
        },
        "admin access granted",
    ))
}

/// GET /api/protected/secret-demo
pub async fn secret_demo(SecretAuth(identity): SecretAuth) -> Json<ApiResponse<SecretDemoResponse>> {
    let weaknesses = [
        "secret never expires",
        "secret cannot be rotated without a store update",
        "secret carries no issuer or audience binding",
        "every request costs a full store scan",
    ];

    Json(ApiResponse::with_message(
        SecretDemoResponse {
            user: identity.public(),
            strategy: "legacy_secret".to_string(),
            weaknesses: weaknesses.iter().map(|w| w.to_string()).collect(),
        },
        "legacy secret accepted; prefer signed tokens",
    ))
}

/// 게이트 시연 라우터 생성.
pub fn access_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/public", get(public))
        .route("/protected", get(protected))
        .route("/protected/secret-demo", get(secret_demo))
}
