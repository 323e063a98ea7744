//! 로그인.
//!
//! 사용자 이름 조회 → argon2 해시 검증 → 토큰 서명.
//! 로그아웃은 클라이언트가 토큰을 버리는 것뿐이라 서버 측 상태가 없습니다.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::Identity;
use crate::error::StoreError;
use crate::password::{verify_password, PasswordError, DUMMY_PASSWORD_HASH};
use crate::pipeline::{SigningError, TokenCodec, DEFAULT_LOOKUP_TIMEOUT};
use crate::store::CredentialStore;

/// 로그인 에러.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// 사용자 없음과 비밀번호 불일치를 구분하지 않습니다.
    #[error("사용자 이름 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
    #[error("저장소 에러: {0}")]
    Store(#[from] StoreError),
    #[error("저장된 비밀번호 해시가 손상되었습니다")]
    CorruptHash,
    #[error("토큰 발급 실패: {0}")]
    Signing(#[from] SigningError),
}

impl LoginError {
    /// 짧은 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials => "AUTHENTICATION_FAILED",
            LoginError::Store(_) => "STORE_UNAVAILABLE",
            LoginError::CorruptHash | LoginError::Signing(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> u16 {
        match self {
            LoginError::InvalidCredentials => 401,
            LoginError::Store(_) => 503,
            LoginError::CorruptHash | LoginError::Signing(_) => 500,
        }
    }
}

/// 로그인 성공 결과.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// 서명된 토큰
    pub token: String,
    /// 로그인한 사용자
    pub identity: Identity,
    /// 토큰 유효 시간 (초). 쿠키 Max-Age에도 같은 값을 씁니다.
    pub expires_in_secs: i64,
}

/// 로그인 처리기.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    lookup_timeout: Duration,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec) -> Self {
        Self {
            store,
            codec,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// 사용자 이름과 비밀번호로 로그인합니다.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        let found = tokio::time::timeout(self.lookup_timeout, self.store.find_by_username(username))
            .await
            .unwrap_or(Err(StoreError::Timeout))?;

        let Some(identity) = found else {
            // 응답 시간으로 사용자 존재 여부가 드러나지 않도록 같은 비용의 검증 수행
            let _ = verify_password(password, DUMMY_PASSWORD_HASH);
            warn!(username = %username, "Login failed: unknown user");
            return Err(LoginError::InvalidCredentials);
        };

        match verify_password(password, identity.password_hash()) {
            Ok(()) => {}
            Err(PasswordError::VerificationFailed) => {
                warn!(user_id = identity.id, "Login failed: wrong password");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => {
                warn!(user_id = identity.id, error = %e, "Stored password hash unusable");
                return Err(LoginError::CorruptHash);
            }
        }

        let issued = self.codec.sign(&identity)?;
        info!(
            user_id = identity.id,
            username = %identity.username,
            role = %identity.role,
            "Login succeeded"
        );

        Ok(LoginOutcome {
            token: issued.token,
            expires_in_secs: issued.claims.exp - issued.claims.iat,
            identity,
        })
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("codec", &self.codec)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}
