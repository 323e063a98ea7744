//! 요청에서 자격증명 후보 추출.
//!
//! 우선순위는 고정입니다:
//! 1. `Authorization: Bearer <value>` 헤더
//! 2. 전략별 쿠키 (`token` 또는 `secret`)
//! 3. 없음
//!
//! 형식이 잘못된 헤더는 없는 것과 같게 취급하며, 추출은 실패하지 않습니다.

use std::collections::HashMap;

/// JWT 전략 쿠키 이름.
pub const TOKEN_COOKIE: &str = "token";
/// 레거시 시크릿 전략 쿠키 이름.
pub const SECRET_COOKIE: &str = "secret";

/// 인증 전략. 라우트별로 정적으로 선택됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStrategy {
    /// 서명 토큰 (권장)
    Jwt,
    /// 레거시 시크릿 (만료 없음, 비교용으로만 유지)
    LegacySecret,
}

impl AuthStrategy {
    /// 이 전략이 읽는 쿠키 이름.
    pub fn cookie_name(&self) -> &'static str {
        match self {
            AuthStrategy::Jwt => TOKEN_COOKIE,
            AuthStrategy::LegacySecret => SECRET_COOKIE,
        }
    }

    /// 메트릭/로그 라벨.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStrategy::Jwt => "jwt",
            AuthStrategy::LegacySecret => "legacy_secret",
        }
    }
}

/// 요청 하나에서 추출된 자격증명 후보.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialCandidate {
    BearerToken(String),
    LegacySecret(String),
    None,
}

impl CredentialCandidate {
    pub fn is_none(&self) -> bool {
        matches!(self, CredentialCandidate::None)
    }

    /// 로그용 종류 라벨.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialCandidate::BearerToken(_) => "bearer_token",
            CredentialCandidate::LegacySecret(_) => "legacy_secret",
            CredentialCandidate::None => "none",
        }
    }
}

// 값은 절대 출력하지 않습니다.
impl std::fmt::Debug for CredentialCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialCandidate::BearerToken(_) => f.write_str("BearerToken(..)"),
            CredentialCandidate::LegacySecret(_) => f.write_str("LegacySecret(..)"),
            CredentialCandidate::None => f.write_str("None"),
        }
    }
}

/// 요청의 헤더/쿠키 필드 접근.
pub trait CredentialSource {
    /// `Authorization` 헤더 원문.
    fn authorization(&self) -> Option<&str>;

    /// 이름으로 쿠키 값 조회.
    fn cookie(&self, name: &str) -> Option<&str>;
}

/// `Bearer <value>`에서 값 추출.
///
/// 첫 공백에서 나누고 스킴이 정확히 `Bearer`여야 합니다.
/// 값이 비어 있으면 `None`.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, value) = header.split_once(' ')?;
    if scheme != "Bearer" {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// 요청에서 후보 하나를 추출합니다. 헤더가 쿠키보다 항상 우선합니다.
pub fn extract<S>(source: &S, strategy: AuthStrategy) -> CredentialCandidate
where
    S: CredentialSource + ?Sized,
{
    let raw = source
        .authorization()
        .and_then(parse_bearer)
        .or_else(|| {
            source
                .cookie(strategy.cookie_name())
                .filter(|v| !v.trim().is_empty())
        });

    match (raw, strategy) {
        (Some(value), AuthStrategy::Jwt) => CredentialCandidate::BearerToken(value.to_string()),
        (Some(value), AuthStrategy::LegacySecret) => {
            CredentialCandidate::LegacySecret(value.to_string())
        }
        (None, _) => CredentialCandidate::None,
    }
}

/// 소유된 헤더/쿠키 값. HTTP 프레임워크 밖에서 파이프라인을 돌릴 때 씁니다.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    authorization: Option<String>,
    cookies: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Authorization` 헤더 원문 설정.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// `Authorization: Bearer <token>` 설정.
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_authorization(format!("Bearer {}", token))
    }

    /// 쿠키 추가.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}
