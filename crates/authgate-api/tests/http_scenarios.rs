//! HTTP 시나리오 통합 테스트
//!
//! 실제 라우터에 요청을 보내 로그인부터 게이트 결정까지 확인합니다.

use std::sync::Arc;

use authgate_api::{create_api_router, AppState};
use authgate_core::{
    AuthConfig, Claims, CredentialStore, InMemoryCredentialStore, Role, TokenCodec,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use tower::ServiceExt;

const JWT_SECRET: &str = "http-scenario-secret-at-least-32-bytes-long";

fn setup() -> (Router, Arc<AppState>) {
    let store = InMemoryCredentialStore::with_demo_users().unwrap();
    let state = Arc::new(AppState::new(
        Arc::new(store),
        AuthConfig::with_secret(JWT_SECRET),
    ));
    (create_api_router().with_state(state.clone()), state)
}

async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, cookie, json)
}

fn login(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// `Set-Cookie` 값에서 `name=value` 부분만 꺼냅니다.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, _, json) = send(app, login(username, password)).await;
    assert_eq!(status, StatusCode::OK);
    json["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_login_then_cookie_reaches_admin_route() {
    let (app, _) = setup();

    let (status, set_cookie, json) = send(&app, login("admin", "admin123")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["token"].is_string());

    let set_cookie = set_cookie.expect("login must set a cookie");
    let (status, _, json) = send(
        &app,
        get_with_cookie("/api/protected", &cookie_pair(&set_cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn wrong_password_issues_no_token() {
    let (app, _) = setup();

    let (status, set_cookie, json) = send(&app, login("admin", "wrongpass")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(set_cookie.is_none());
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "AUTHENTICATION_FAILED");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn unknown_user_matches_wrong_password_response() {
    let (app, _) = setup();

    let (_, _, wrong_password) = send(&app, login("admin", "wrongpass")).await;
    let (status, _, unknown_user) = send(&app, login("mallory", "admin123")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn required_route_without_credentials_is_401() {
    let (app, _) = setup();

    let request = Request::builder()
        .uri("/api/profile")
        .body(Body::empty())
        .unwrap();
    let (status, _, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "MISSING_CREDENTIAL");
    assert_eq!(json["message"], "no token provided");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (app, _) = setup();
    let codec = TokenCodec::new(
        JWT_SECRET.as_bytes(),
        "authgate",
        "authgate-users",
        Duration::hours(1),
    );
    let now = Utc::now();
    let token = codec
        .encode_claims(&Claims {
            user_id: 1,
            username: "admin".into(),
            role: Role::Admin,
            iat: (now - Duration::hours(1)).timestamp(),
            exp: (now - Duration::seconds(1)).timestamp(),
            iss: "authgate".into(),
            aud: "authgate-users".into(),
        })
        .unwrap();

    let (status, _, json) = send(&app, get_with_bearer("/api/protected", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "invalid or expired token");
    assert_eq!(json["error"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn basic_user_is_forbidden_not_unauthorized() {
    let (app, _) = setup();
    let token = login_token(&app, "user", "user123").await;

    let (status, _, json) = send(&app, get_with_bearer("/api/protected", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "INSUFFICIENT_ROLE");
    assert_eq!(json["message"], "insufficient role");

    // 같은 토큰으로 RequiredGate 라우트는 통과
    let (status, _, _) = send(&app, get_with_bearer("/api/profile", &token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn role_downgrade_applies_to_existing_token() {
    let (app, state) = setup();
    let token = login_token(&app, "admin", "admin123").await;

    let (status, _, _) = send(&app, get_with_bearer("/api/protected", &token)).await;
    assert_eq!(status, StatusCode::OK);

    state.store.set_role(1, Role::Basic).await.unwrap();

    let (status, _, _) = send(&app, get_with_bearer("/api/protected", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleted_user_token_is_rejected() {
    let (app, state) = setup();
    let token = login_token(&app, "user", "user123").await;

    state.store.remove(2).await;

    let (status, _, json) = send(&app, get_with_bearer("/api/profile", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "UNKNOWN_PRINCIPAL");
    assert_eq!(json["message"], "user no longer exists");
}

#[tokio::test]
async fn header_token_wins_over_cookie() {
    let (app, _) = setup();
    let admin = login_token(&app, "admin", "admin123").await;
    let user = login_token(&app, "user", "user123").await;

    let request = Request::builder()
        .uri("/api/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", user))
        .header(header::COOKIE, format!("token={}", admin))
        .body(Body::empty())
        .unwrap();
    let (status, _, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["username"], "user");
}

#[tokio::test]
async fn public_route_greets_optional_identity() {
    let (app, _) = setup();
    let token = login_token(&app, "user", "user123").await;

    let (status, _, json) = send(&app, get_with_bearer("/api/public", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["authenticated"], true);
    assert_eq!(json["data"]["greeting"], "Hello, user!");

    let request = Request::builder()
        .uri("/api/public")
        .body(Body::empty())
        .unwrap();
    let (status, _, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["authenticated"], false);
}

#[tokio::test]
async fn logout_clears_cookie_but_token_stays_valid() {
    let (app, _) = setup();
    let token = login_token(&app, "admin", "admin123").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .body(Body::empty())
        .unwrap();
    let (status, set_cookie, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(set_cookie.unwrap().contains("Max-Age=0"));

    // 서버 측 폐기 목록이 없으므로 기존 토큰은 계속 통과
    let (status, _, _) = send(&app, get_with_bearer("/api/protected", &token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn concurrent_profile_updates_have_one_winner() {
    let (app, state) = setup();
    let token = login_token(&app, "user", "user123").await;

    let requests = (0..4).map(|i| {
        let app = app.clone();
        let token = token.clone();
        tokio::spawn(async move {
            let request = Request::builder()
                .method("PUT")
                .uri("/api/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": format!("renamed-{}", i) }).to_string(),
                ))
                .unwrap();
            app.oneshot(request).await.unwrap().status()
        })
    });

    let mut ok = 0;
    for handle in requests.collect::<Vec<_>>() {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {}", other),
        }
    }

    assert!(ok >= 1);
    let current = state.store.find_by_id(2).await.unwrap().unwrap();
    assert!(current.username.starts_with("renamed-"));
}

#[tokio::test]
async fn health_and_service_info() {
    let (app, _) = setup();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, _, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "authgate");
}

#[tokio::test]
async fn legacy_secret_route_requires_admin_role() {
    let (app, _) = setup();

    let (status, _, json) = send(
        &app,
        get_with_cookie("/api/protected/secret-demo", "secret=user-secret-456"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "INSUFFICIENT_ROLE");

    let (status, _, json) = send(
        &app,
        get_with_cookie("/api/protected/secret-demo", "secret=admin-secret-123"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn malformed_login_body_gets_validation_envelope() {
    let (app, _) = setup();

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username":"admin"}"#))
        .unwrap();
    let (status, set_cookie, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(set_cookie.is_none());
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn profile_stats_uses_camel_case_fields() {
    let (app, _) = setup();
    let token = login_token(&app, "user", "user123").await;

    let (status, _, json) = send(&app, get_with_bearer("/api/profile/stats", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["userId"], 2);
    assert_eq!(json["data"]["role"], "basic");

    let (_, _, json) = send(&app, get_with_bearer("/api/profile", &token)).await;
    assert!(json["data"]["user"]["createdAt"].is_string());
}
