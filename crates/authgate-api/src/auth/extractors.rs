//! 파이프라인을 실행하는 Axum 추출기.
//!
//! 라우트는 추출기 타입으로 전략과 게이트를 정적으로 고릅니다.
//!
//! | 추출기 | 전략 | 게이트 |
//! |--------|------|--------|
//! | [`OptionalAuth`] | JWT | OptionalGate |
//! | [`RequiredAuth`] | JWT | RequiredGate |
//! | [`AdminAuth`] | JWT | RoleGate(admin) |
//! | [`SecretAuth`] | 레거시 시크릿 | RoleGate(admin) |
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(AdminAuth(identity): AdminAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.username)
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use authgate_core::{
    resolve_request, AuthError, CredentialSource, Gate, GateOutcome, Identity, OptionalGate,
    Rejection, RequiredGate, Role, RoleGate, Verifier,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::error::ApiError;
use crate::metrics::record_auth_resolution;
use crate::state::AppState;

/// 요청 헤더에서 읽은 자격증명 필드.
pub struct RequestCredentials<'a> {
    headers: &'a HeaderMap,
    jar: CookieJar,
}

impl<'a> RequestCredentials<'a> {
    pub fn from_headers(headers: &'a HeaderMap) -> Self {
        Self {
            headers,
            jar: CookieJar::from_headers(headers),
        }
    }
}

impl CredentialSource for RequestCredentials<'_> {
    fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.jar.get(name).map(|cookie| cookie.value())
    }
}

/// 추출 → 확인 → 게이트. 확인 결과는 메트릭으로 남깁니다.
async fn run_pipeline(parts: &Parts, verifier: &dyn Verifier, gate: &dyn Gate) -> GateOutcome {
    let credentials = RequestCredentials::from_headers(&parts.headers);
    let resolution = resolve_request(verifier, &credentials).await;
    record_auth_resolution(verifier.strategy().as_str(), resolution.outcome_label());
    gate.decide(&resolution)
}

/// 진행 결과에서 신원을 꺼냅니다. 신원 없는 진행은 OptionalGate에서만 나옵니다.
fn required_identity(outcome: GateOutcome) -> Result<Identity, ApiError> {
    match outcome.into_result()? {
        Some(identity) => Ok(identity),
        None => Err(ApiError::Auth(Rejection::new(
            AuthError::MissingCredential,
            "no token provided",
        ))),
    }
}

/// 선택적 인증. 신원이 없거나 확인에 실패해도 요청은 진행됩니다.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Identity>);

impl FromRequestParts<Arc<AppState>> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let outcome = run_pipeline(parts, state.jwt_verifier.as_ref(), &OptionalGate).await;
        Ok(OptionalAuth(outcome.into_result().ok().flatten()))
    }
}

/// 인증 필수 (JWT).
#[derive(Debug, Clone)]
pub struct RequiredAuth(pub Identity);

impl FromRequestParts<Arc<AppState>> for RequiredAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let outcome = run_pipeline(parts, state.jwt_verifier.as_ref(), &RequiredGate).await;
        required_identity(outcome).map(RequiredAuth)
    }
}

/// Admin 역할 필수 (JWT). 인증 실패는 401, 역할 불일치는 403.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Identity);

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let gate = RoleGate::new(Role::Admin);
        let outcome = run_pipeline(parts, state.jwt_verifier.as_ref(), &gate).await;
        required_identity(outcome).map(AdminAuth)
    }
}

/// 레거시 시크릿 + Admin 역할 필수.
///
/// 시크릿은 `secret` 쿠키 또는 Bearer 헤더로 받습니다. 인증 실패는 401,
/// 역할 불일치는 403.
#[derive(Debug, Clone)]
pub struct SecretAuth(pub Identity);

impl FromRequestParts<Arc<AppState>> for SecretAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let outcome =
            run_pipeline(parts, state.legacy_verifier.as_ref(), &RoleGate::admin()).await;
        required_identity(outcome).map(SecretAuth)
    }
}
