//! Authgate API 서버.
//!
//! 설정은 `config/default.toml`(선택)과 `AUTHGATE__SECTION__KEY` 환경 변수에서
//! 읽습니다. `.env` 파일이 있으면 먼저 로드합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use authgate_api::{create_api_router, metrics_layer, setup_metrics_recorder, AppState};
use authgate_core::{init_logging, AppConfig, InMemoryCredentialStore, LogConfig};

/// CORS 레이어 생성.
///
/// origin 목록이 설정되어 있으면 해당 origin만 허용하고 쿠키 포함 요청도
/// 허용합니다. 비어 있으면 개발 모드로 간주하여 모든 origin을 허용하되
/// 자격 증명은 허용하지 않습니다.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let (allow_origin, allow_credentials) = if parsed.is_empty() {
        warn!("server.cors_origins not set, allowing any origin without credentials");
        (AllowOrigin::any(), false)
    } else {
        info!("CORS configured with {} allowed origins", parsed.len());
        (AllowOrigin::list(parsed), true)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(allow_credentials)
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    cors_origins: &[String],
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(cors_origins))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("failed to load configuration")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting Authgate API server...");

    let metrics_handle = setup_metrics_recorder().context("failed to install metrics recorder")?;
    info!("Prometheus metrics recorder initialized");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let store = InMemoryCredentialStore::with_demo_users().context("failed to seed users")?;
    let stats = store.stats().await;
    info!(
        users = stats.total_users,
        admins = stats.admins,
        "Credential store initialized"
    );

    let cors_origins = config.server.cors_origins.clone();
    let state = Arc::new(AppState::new(Arc::new(store), config.auth));
    info!(
        version = %state.version,
        token_ttl_secs = state.token_ttl_secs(),
        "Application state initialized"
    );

    let app = create_router(state, metrics_handle, &cors_origins);

    info!(%addr, "API server listening");
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다. 핸들러 설치에
/// 실패한 시그널은 무시하고 나머지 시그널만 기다립니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
