//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 정보
//! - `/health` - 헬스 체크
//! - `/api/login`, `/api/logout` - 로그인/로그아웃
//! - `/api/public` - 선택적 인증
//! - `/api/protected` - admin 전용
//! - `/api/protected/secret-demo` - 레거시 시크릿 인증
//! - `/api/profile` - 프로필 조회/수정
//! - `/api/profile/stats` - 계정 통계

pub mod access;
pub mod auth;
pub mod health;
pub mod profile;

pub use access::{access_router, ProtectedResponse, PublicResponse, SecretDemoResponse};
pub use auth::{auth_router, LoginRequest, LoginResponse, LogoutResponse};
pub use health::{health_router, service_info, HealthResponse, ServiceInfo};
pub use profile::{profile_router, ProfileResponse, ProfileStats, UpdateProfileRequest};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_info))
        .nest("/health", health_router())
        .nest(
            "/api",
            auth_router()
                .merge(access_router())
                .nest("/profile", profile_router()),
        )
}
