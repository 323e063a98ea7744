//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 저장소 인스턴스 하나를 생성 시점에 만들어 검증기와 서비스에 주입합니다.
//! 전역 상태는 없으며 `Arc`로 래핑되어 요청 간에 공유됩니다.

use std::sync::Arc;
use std::time::Duration;

use authgate_core::{
    AuthConfig, Authenticator, CredentialStore, InMemoryCredentialStore, JwtVerifier,
    LegacySecretVerifier, ProfileService, TokenCodec,
};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 자격증명 저장소
    pub store: Arc<InMemoryCredentialStore>,

    /// 토큰 코덱 (로그인 서명과 검증이 같은 키를 씁니다)
    pub codec: TokenCodec,

    /// JWT 전략 검증기
    pub jwt_verifier: Arc<JwtVerifier>,

    /// 레거시 시크릿 전략 검증기
    pub legacy_verifier: Arc<LegacySecretVerifier>,

    /// 로그인 처리기
    pub authenticator: Authenticator,

    /// 프로필 수정 서비스
    pub profiles: ProfileService,

    /// 인증 설정 (쿠키 플래그 등)
    pub auth_config: Arc<AuthConfig>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소와 인증 설정으로 상태 생성.
    pub fn new(store: Arc<InMemoryCredentialStore>, auth_config: AuthConfig) -> Self {
        let codec = TokenCodec::from_config(&auth_config);
        let lookup_timeout = Duration::from_millis(auth_config.lookup_timeout_ms);
        let shared: Arc<dyn CredentialStore> = store.clone();

        Self {
            jwt_verifier: Arc::new(
                JwtVerifier::new(codec.clone(), shared.clone()).with_lookup_timeout(lookup_timeout),
            ),
            legacy_verifier: Arc::new(
                LegacySecretVerifier::new(shared.clone()).with_lookup_timeout(lookup_timeout),
            ),
            authenticator: Authenticator::new(shared.clone(), codec.clone())
                .with_lookup_timeout(lookup_timeout),
            profiles: ProfileService::new(shared),
            codec,
            store,
            auth_config: Arc::new(auth_config),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 토큰 유효 시간(초). 쿠키 Max-Age에도 씁니다.
    pub fn token_ttl_secs(&self) -> i64 {
        self.codec.ttl().num_seconds()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("codec", &self.codec)
            .field("started_at", &self.started_at)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// 테스트용 시크릿.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 데모 사용자가 들어 있는 테스트용 상태.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    let store = InMemoryCredentialStore::with_demo_users()
        .expect("Failed to seed demo users for test");
    AppState::new(Arc::new(store), AuthConfig::with_secret(TEST_JWT_SECRET))
}
