//! 신원 확인.
//!
//! JWT와 레거시 시크릿 두 전략이 같은 [`Verifier`] 계약을 구현합니다.
//! 어떤 경로든 panic이나 에러 없이 [`Resolution`] 값으로 끝납니다.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::extractor::{extract, AuthStrategy, CredentialCandidate, CredentialSource};
use super::token::{TokenCodec, VerificationError};
use crate::domain::Identity;
use crate::error::{AuthError, Rejection, StoreError, StoreResult};
use crate::logging::redact;
use crate::store::CredentialStore;

/// 저장소 조회 기본 타임아웃.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2000);

/// 요청 단위 확인 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 저장소에서 다시 조회한 현재 신원
    Authenticated(Identity),
    /// 거부 사유
    Rejected(Rejection),
}

impl Resolution {
    pub fn rejected(error: AuthError, reason: impl Into<String>) -> Self {
        Resolution::Rejected(Rejection::new(error, reason))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Resolution::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Resolution::Authenticated(identity) => Some(identity),
            Resolution::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Resolution::Authenticated(_) => None,
            Resolution::Rejected(rejection) => Some(rejection),
        }
    }

    /// 메트릭 라벨: `authenticated` 또는 거부 코드.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            Resolution::Authenticated(_) => "authenticated",
            Resolution::Rejected(rejection) => rejection.code(),
        }
    }
}

/// 자격증명 후보를 신원으로 확인하는 전략.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// 이 검증기가 처리하는 전략.
    fn strategy(&self) -> AuthStrategy;

    /// 후보 하나를 확인합니다.
    async fn resolve(&self, candidate: CredentialCandidate) -> Resolution;
}

/// 요청에서 후보를 추출해 바로 확인합니다.
pub async fn resolve_request<V, S>(verifier: &V, source: &S) -> Resolution
where
    V: Verifier + ?Sized,
    S: CredentialSource + ?Sized,
{
    let candidate = extract(source, verifier.strategy());
    debug!(
        strategy = verifier.strategy().as_str(),
        kind = candidate.kind(),
        "Credential extracted"
    );
    verifier.resolve(candidate).await
}

/// 타임아웃을 걸고 저장소를 조회합니다.
async fn lookup_with_timeout<F>(timeout: Duration, lookup: F) -> StoreResult<Option<Identity>>
where
    F: Future<Output = StoreResult<Option<Identity>>>,
{
    tokio::time::timeout(timeout, lookup)
        .await
        .unwrap_or(Err(StoreError::Timeout))
}

fn store_unavailable(strategy: AuthStrategy, err: &StoreError) -> Resolution {
    warn!(
        strategy = strategy.as_str(),
        error = %err,
        code = AuthError::StoreUnavailable.code(),
        "Credential store lookup failed"
    );
    Resolution::rejected(AuthError::StoreUnavailable, "credential store unavailable")
}

fn reject(strategy: AuthStrategy, error: AuthError, reason: &str) -> Resolution {
    if error == AuthError::MissingCredential {
        debug!(strategy = strategy.as_str(), code = error.code(), "No credential presented");
    } else {
        warn!(strategy = strategy.as_str(), code = error.code(), "Authentication rejected");
    }
    Resolution::rejected(error, reason)
}

fn authenticated(strategy: AuthStrategy, identity: Identity) -> Resolution {
    info!(
        strategy = strategy.as_str(),
        user_id = identity.id,
        username = %identity.username,
        "Authenticated"
    );
    Resolution::Authenticated(identity)
}

/// 서명 토큰 전략.
///
/// 토큰에서는 `user_id`만 신뢰하고, 역할과 이름은 매 요청마다 저장소에서
/// 다시 읽습니다. 역할 강등은 기존 토큰이 만료되기 전이라도 바로 반영됩니다.
#[derive(Clone)]
pub struct JwtVerifier {
    codec: TokenCodec,
    store: Arc<dyn CredentialStore>,
    lookup_timeout: Duration,
}

impl JwtVerifier {
    pub fn new(codec: TokenCodec, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            codec,
            store,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("codec", &self.codec)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl From<VerificationError> for AuthError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::Malformed => AuthError::MalformedCredential,
            VerificationError::BadSignature | VerificationError::WrongIssuerAudience => {
                AuthError::BadSignature
            }
            VerificationError::Expired => AuthError::Expired,
        }
    }
}

#[async_trait]
impl Verifier for JwtVerifier {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::Jwt
    }

    async fn resolve(&self, candidate: CredentialCandidate) -> Resolution {
        let strategy = self.strategy();
        let token = match candidate {
            CredentialCandidate::BearerToken(token) => token,
            _ => return reject(strategy, AuthError::MissingCredential, "no token provided"),
        };

        let claims = match self.codec.verify(&token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(token = %redact(&token), error = %err, "Token verification failed");
                return reject(strategy, err.into(), "invalid or expired token");
            }
        };

        match lookup_with_timeout(self.lookup_timeout, self.store.find_by_id(claims.user_id)).await
        {
            Ok(Some(identity)) => authenticated(strategy, identity),
            Ok(None) => {
                debug!(user_id = claims.user_id, "Token subject no longer exists");
                reject(strategy, AuthError::UnknownPrincipal, "user no longer exists")
            }
            Err(err) => store_unavailable(strategy, &err),
        }
    }
}

/// 레거시 시크릿 전략.
///
/// 시크릿에는 만료 개념이 없습니다. 유출되면 저장소에서 바꿀 때까지
/// 계속 유효하며, 서명 토큰과 비교하기 위한 용도로만 남겨 둡니다.
#[derive(Clone)]
pub struct LegacySecretVerifier {
    store: Arc<dyn CredentialStore>,
    lookup_timeout: Duration,
}

impl LegacySecretVerifier {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for LegacySecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacySecretVerifier")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Verifier for LegacySecretVerifier {
    fn strategy(&self) -> AuthStrategy {
        AuthStrategy::LegacySecret
    }

    async fn resolve(&self, candidate: CredentialCandidate) -> Resolution {
        let strategy = self.strategy();
        let secret = match candidate {
            CredentialCandidate::LegacySecret(secret) => secret,
            _ => return reject(strategy, AuthError::MissingCredential, "no secret provided"),
        };

        match lookup_with_timeout(self.lookup_timeout, self.store.find_by_secret(&secret)).await {
            Ok(Some(identity)) => authenticated(strategy, identity),
            Ok(None) => {
                debug!(secret = %redact(&secret), "Secret not recognized");
                reject(strategy, AuthError::UnknownPrincipal, "secret not recognized")
            }
            Err(err) => store_unavailable(strategy, &err),
        }
    }
}
