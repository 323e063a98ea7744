//! HTTP 요청 metrics middleware.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    record_access_denial, record_http_duration, record_http_request, record_http_response,
    route_label,
};

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// 요청/응답 수와 처리 시간 외에, 게이트가 거부한 응답(401, 403)은
/// `access_denials_total`로 따로 셉니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = route_label(request.uri().path());

    record_http_request(&method, route);

    let response = next.run(request).await;
    let status = response.status();

    record_http_response(&method, route, status.as_u16());
    record_http_duration(&method, route, start.elapsed().as_secs_f64());
    if is_access_denial(status) {
        record_access_denial(route, status.as_u16());
    }

    response
}

fn is_access_denial(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
