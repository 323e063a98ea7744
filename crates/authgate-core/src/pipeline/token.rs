//! 토큰 서명/검증.
//!
//! HS256 JWT에 신원 스냅샷(Claims)을 담고 발급자/대상을 고정합니다.
//! 만료는 `exp <= now`이면 만료로 판정합니다 (유효 조건은 `now < exp`).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;
use crate::domain::{Identity, Role, UserId};

/// 시크릿 미설정 시 사용하는 개발용 서명 키.
const DEVELOPMENT_SECRET: &str = "development-secret-key-change-in-production";

/// 토큰 페이로드.
///
/// 서명 시점의 스냅샷입니다. 인가 판단에는 `user_id`만 신뢰하고
/// 이름/역할은 저장소에서 다시 조회합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// 서명 시점의 사용자 이름
    pub username: String,
    /// 서명 시점의 역할
    pub role: Role,
    /// 발급 시각 (Unix timestamp)
    pub iat: i64,
    /// 만료 시각 (Unix timestamp)
    pub exp: i64,
    /// 발급자
    pub iss: String,
    /// 대상
    pub aud: String,
}

impl Claims {
    /// `now` 기준 만료 여부. `exp == now`도 만료입니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// 토큰 검증 실패.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("서명 불일치")]
    BadSignature,
    #[error("발급자 또는 대상 불일치")]
    WrongIssuerAudience,
    #[error("토큰이 만료되었습니다")]
    Expired,
}

/// 토큰 서명 에러.
#[derive(Debug, thiserror::Error)]
#[error("토큰 인코딩 실패: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// 서명된 토큰과 만료 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// 토큰 코덱.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// 서명 키와 메타데이터로 코덱 생성.
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        }
    }

    /// 인증 설정으로 코덱 생성. 시크릿이 없으면 개발용 키를 쓰고 경고합니다.
    pub fn from_config(config: &AuthConfig) -> Self {
        let ttl = Duration::seconds(config.token_ttl_secs.min(u32::MAX as u64) as i64);
        match &config.jwt_secret {
            Some(secret) => Self::new(
                secret.expose_secret().as_bytes(),
                &config.issuer,
                &config.audience,
                ttl,
            ),
            None => {
                warn!("auth.jwt_secret not set, using development secret (INSECURE)");
                Self::new(
                    DEVELOPMENT_SECRET.as_bytes(),
                    &config.issuer,
                    &config.audience,
                    ttl,
                )
            }
        }
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 현재 시각으로 서명.
    pub fn sign(&self, identity: &Identity) -> Result<IssuedToken, SigningError> {
        self.sign_at(identity, Utc::now())
    }

    /// 지정 시각으로 서명. 같은 입력과 시각이면 같은 토큰이 나옵니다.
    pub fn sign_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, SigningError> {
        let claims = Claims {
            user_id: identity.id,
            username: identity.username.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = self.encode_claims(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// 임의 Claims 인코딩. 발급자/대상은 호출자가 채운 값을 그대로 씁니다.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, SigningError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }

    /// 현재 시각 기준 검증.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    /// 지정 시각 기준 검증.
    ///
    /// 서명, 발급자, 대상을 확인한 뒤 `now < exp`를 검사합니다.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        // 만료는 아래에서 `now` 기준으로 직접 판정합니다.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    VerificationError::BadSignature
                }
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    VerificationError::WrongIssuerAudience
                }
                ErrorKind::ExpiredSignature => VerificationError::Expired,
                _ => VerificationError::Malformed,
            }
        })?;

        if data.claims.is_expired_at(now) {
            return Err(VerificationError::Expired);
        }

        Ok(data.claims)
    }
}
