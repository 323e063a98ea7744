//! 사용자 신원 레코드.
//!
//! `Identity`는 자격증명 저장소가 소유하며, 파이프라인은 요청 단위로
//! 복제본을 빌려 씁니다. 비밀번호 해시와 레거시 시크릿 다이제스트는
//! 직렬화되지 않고 `Debug` 출력에서도 가려집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Role;
use crate::password::{hash_password, PasswordError};

/// 사용자 ID. 레코드 수명 동안 변하지 않습니다.
pub type UserId = i64;

/// 저장소에 보관되는 사용자 신원.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// 고유하고 불변인 사용자 ID
    pub id: UserId,
    /// 사용자 이름 (프로필 수정으로 변경 가능)
    pub username: String,
    /// 사용자 역할
    pub role: Role,
    /// argon2id PHC 해시
    password_hash: String,
    /// 레거시 시크릿의 SHA-256 hex 다이제스트
    secret_digest: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// 평문 비밀번호와 레거시 시크릿으로 새 신원 생성.
    ///
    /// 비밀번호는 argon2id로 해싱되고 시크릿은 다이제스트만 보관됩니다.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        role: Role,
        password: &str,
        legacy_secret: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            id,
            username: username.into(),
            role,
            password_hash: hash_password(password)?,
            secret_digest: digest_secret(legacy_secret),
            created_at,
        })
    }

    /// 이미 해싱된 값으로 신원 복원 (영속 저장소 로딩용).
    pub fn from_stored(
        id: UserId,
        username: impl Into<String>,
        role: Role,
        password_hash: impl Into<String>,
        secret_digest: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            password_hash: password_hash.into(),
            secret_digest: secret_digest.into(),
            created_at,
        }
    }

    /// 저장된 비밀번호 해시.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// 레거시 시크릿이 일치하는지 상수 시간으로 비교.
    pub fn matches_secret(&self, candidate: &str) -> bool {
        constant_time_eq(
            digest_secret(candidate).as_bytes(),
            self.secret_digest.as_bytes(),
        )
    }

    /// 응답에 노출 가능한 공개 뷰.
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("password_hash", &"[REDACTED]")
            .field("secret_digest", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// 민감 필드를 제외한 신원 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// 레거시 시크릿 다이제스트 (SHA-256 hex).
pub fn digest_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// 길이가 같은 입력에 대해 분기 없이 비교합니다.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
