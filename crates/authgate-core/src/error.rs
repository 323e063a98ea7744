//! 인증 파이프라인 에러 타입.
//!
//! 모든 에러는 로컬에서 분류되는 종결 상태이며 재시도하지 않습니다.
//! 파이프라인 경계 밖으로는 panic 없이 값으로만 전달됩니다.

use thiserror::Error;

/// 인증/인가 실패 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AuthError {
    /// 자격증명이 요청에 없음
    #[error("자격증명이 없습니다")]
    MissingCredential,
    /// 토큰 구조/클레임이 손상됨
    #[error("잘못된 형식의 자격증명")]
    MalformedCredential,
    /// 서명 불일치 또는 발급자/대상 불일치
    #[error("서명 검증 실패")]
    BadSignature,
    /// 토큰 만료
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 토큰 발급 후 삭제된 사용자, 또는 인식되지 않는 시크릿
    #[error("알 수 없는 사용자")]
    UnknownPrincipal,
    /// 인증은 되었으나 역할 부족
    #[error("권한이 부족합니다")]
    WrongRole,
    /// 자격증명 저장소 장애 (5xx)
    #[error("자격증명 저장소를 사용할 수 없습니다")]
    StoreUnavailable,
}

impl AuthError {
    /// 응답 페이로드의 `error` 필드에 쓰이는 짧은 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::MalformedCredential => "MALFORMED_CREDENTIAL",
            AuthError::BadSignature => "BAD_SIGNATURE",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::UnknownPrincipal => "UNKNOWN_PRINCIPAL",
            AuthError::WrongRole => "INSUFFICIENT_ROLE",
            AuthError::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::WrongRole => 403,
            AuthError::StoreUnavailable => 503,
            _ => 401,
        }
    }
}

/// 거부 사유. Resolution과 게이트 결과에 담겨 호출자에게 그대로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 분류
    pub error: AuthError,
    /// 사람이 읽을 수 있는 사유
    pub reason: String,
}

impl Rejection {
    pub fn new(error: AuthError, reason: impl Into<String>) -> Self {
        Self {
            error,
            reason: reason.into(),
        }
    }

    /// 짧은 에러 코드.
    pub fn code(&self) -> &'static str {
        self.error.code()
    }

    /// HTTP 상태 코드 (401, 403, 503).
    pub fn status(&self) -> u16 {
        self.error.status()
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.reason)
    }
}

/// 자격증명 저장소 에러.
///
/// "사용자 없음"은 에러가 아니라 `Ok(None)`으로 표현됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 백엔드 연결 실패
    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),
    /// 조회 타임아웃
    #[error("저장소 조회 타임아웃")]
    Timeout,
    /// 갱신 대상 레코드 없음
    #[error("레코드를 찾을 수 없습니다")]
    NotFound,
    /// compare-and-swap 기대값 불일치
    #[error("동시 수정 충돌")]
    Conflict,
    /// 이미 사용 중인 사용자 이름
    #[error("이미 사용 중인 사용자 이름입니다")]
    UsernameTaken,
}

/// 저장소 작업용 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingCredential.status(), 401);
        assert_eq!(AuthError::MalformedCredential.status(), 401);
        assert_eq!(AuthError::BadSignature.status(), 401);
        assert_eq!(AuthError::Expired.status(), 401);
        assert_eq!(AuthError::UnknownPrincipal.status(), 401);
        assert_eq!(AuthError::WrongRole.status(), 403);
        assert_eq!(AuthError::StoreUnavailable.status(), 503);
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::new(AuthError::MissingCredential, "no token provided");
        assert_eq!(rejection.to_string(), "[MISSING_CREDENTIAL] no token provided");
        assert_eq!(rejection.status(), 401);
    }
}
