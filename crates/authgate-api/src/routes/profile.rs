//! 프로필 endpoint.
//!
//! 모두 RequiredGate 뒤에 있습니다. 수정은 저장소 compare-and-swap으로
//! 처리되어 동시 수정 중 하나만 성공하고 나머지는 409를 받습니다.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use authgate_core::{Identity, PublicIdentity, Role, UserId};

use crate::auth::RequiredAuth;
use crate::error::{ApiResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// 프로필 수정 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "username은 1-64자여야 합니다"))]
    pub username: String,
}

/// 프로필 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: PublicIdentity,
}

/// 계정 통계 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    /// 가입 후 경과 일수 ("N days")
    pub account_age: String,
    /// 가입 시각 (ISO 8601)
    pub account_created: String,
}

impl ProfileStats {
    /// `now` 기준으로 통계를 계산합니다. 경과 일수는 내림합니다.
    pub fn at(identity: &Identity, now: DateTime<Utc>) -> Self {
        let days = (now - identity.created_at).num_days().max(0);
        Self {
            user_id: identity.id,
            username: identity.username.clone(),
            role: identity.role,
            account_age: format!("{} days", days),
            account_created: identity.created_at.to_rfc3339(),
        }
    }
}

/// GET /api/profile
pub async fn get_profile(RequiredAuth(identity): RequiredAuth) -> Json<ApiResponse<ProfileResponse>> {
    Json(ApiResponse::ok(ProfileResponse {
        user: identity.public(),
    }))
}

/// PUT /api/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    RequiredAuth(identity): RequiredAuth,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<ProfileResponse>>> {
    let updated = state
        .profiles
        .update_username(&identity, &request.username)
        .await?;

    Ok(Json(ApiResponse::with_message(
        ProfileResponse {
            user: updated.public(),
        },
        "profile updated",
    )))
}

/// GET /api/profile/stats
pub async fn profile_stats(RequiredAuth(identity): RequiredAuth) -> Json<ApiResponse<ProfileStats>> {
    Json(ApiResponse::with_message(
        ProfileStats::at(&identity, Utc::now()),
        "user statistics retrieved",
    ))
}

/// 프로필 라우터 생성.
pub fn profile_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/stats", get(profile_stats))
}
