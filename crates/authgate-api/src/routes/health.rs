//! 헬스 체크 및 서비스 정보 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use authgate_core::StoreStats;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 서비스 상태 ("healthy")
    pub status: String,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
    /// 저장소 사용자 수
    pub users: StoreStatsView,
}

/// 역할별 사용자 수.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStatsView {
    pub total: usize,
    pub admins: usize,
    pub basics: usize,
}

impl From<StoreStats> for StoreStatsView {
    fn from(stats: StoreStats) -> Self {
        Self {
            total: stats.total_users,
            admins: stats.admins,
            basics: stats.basics,
        }
    }
}

/// 서비스 정보 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        users: state.store.stats().await.into(),
    })
}

/// GET /
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    let endpoints = [
        "POST /api/login",
        "POST /api/logout",
        "GET /api/public",
        "GET /api/protected",
        "GET /api/protected/secret-demo",
        "GET /api/profile",
        "PUT /api/profile",
        "GET /api/profile/stats",
        "GET /health",
        "GET /metrics",
    ];

    Json(ServiceInfo {
        name: "authgate".to_string(),
        version: state.version.clone(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}
