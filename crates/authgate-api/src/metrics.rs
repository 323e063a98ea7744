//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, route: &'static str) {
    counter!("http_requests_total", "method" => method.to_string(), "route" => route)
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, route: &'static str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, route: &'static str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route
    )
    .record(duration_secs);
}

// ============================================================================
// 인증 메트릭 헬퍼 함수
// ============================================================================

/// 신원 확인 결과 카운터 증가.
///
/// `outcome`은 `authenticated` 또는 거부 코드입니다.
pub fn record_auth_resolution(strategy: &'static str, outcome: &'static str) {
    counter!("auth_resolutions_total", "strategy" => strategy, "outcome" => outcome).increment(1);
}

/// 게이트 거부(401/403) 카운터 증가.
pub fn record_access_denial(route: &'static str, status: u16) {
    counter!("access_denials_total", "route" => route, "status" => status.to_string())
        .increment(1);
}

/// 로그인 시도 카운터 증가.
pub fn record_login_attempt(outcome: &'static str) {
    counter!("login_attempts_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// 라우트 라벨
// ============================================================================

/// 메트릭 라벨로 쓰는 알려진 라우트.
const KNOWN_ROUTES: &[&str] = &[
    "/",
    "/health",
    "/metrics",
    "/api/login",
    "/api/logout",
    "/api/public",
    "/api/protected",
    "/api/protected/secret-demo",
    "/api/profile",
    "/api/profile/stats",
];

/// 요청 경로를 라우트 라벨로 변환합니다.
///
/// 알 수 없는 경로는 모두 `unmatched`로 묶어 라벨 카디널리티를 제한합니다.
/// 끝의 `/`는 무시합니다.
pub fn route_label(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        other => other,
    };
    KNOWN_ROUTES
        .iter()
        .find(|route| **route == trimmed)
        .copied()
        .unwrap_or("unmatched")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_known() {
        assert_eq!(route_label("/api/profile"), "/api/profile");
        assert_eq!(route_label("/api/profile/"), "/api/profile");
        assert_eq!(route_label("/api/protected/secret-demo"), "/api/protected/secret-demo");
    }

    #[test]
    fn test_route_label_root() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label(""), "/");
    }

    #[test]
    fn test_route_label_unknown_paths_collapse() {
        assert_eq!(route_label("/api/users/42"), "unmatched");
        assert_eq!(route_label("/wp-admin"), "unmatched");
    }
}
