//! 신원 확인 파이프라인의 HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (로그인, 로그아웃, 게이트 시연, 프로필)
//! - 요청마다 코어 파이프라인을 실행하는 인증 추출기
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 인증 추출기와 세션 쿠키
//! - [`error`]: 응답 봉투와 에러 응답
//! - [`extract`]: 검증된 JSON 본문 추출기
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::{AdminAuth, OptionalAuth, RequiredAuth, SecretAuth};
pub use error::{ApiError, ApiResponse, ApiResult, ErrorBody};
pub use extract::ValidatedJson;
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, TEST_JWT_SECRET};
