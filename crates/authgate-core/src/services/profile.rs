//! 프로필 수정.
//!
//! 이미 `RequiredGate`를 통과한 신원에 대해서만 호출합니다. 갱신은
//! 저장소의 compare-and-swap으로 처리되어, 같은 사용자에 대한 동시 수정은
//! 하나만 성공하고 나머지는 `Conflict`를 받습니다.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::Identity;
use crate::error::StoreError;
use crate::store::CredentialStore;

/// 사용자 이름 최대 길이.
pub const MAX_USERNAME_LEN: usize = 64;

/// 프로필 수정 에러.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("잘못된 사용자 이름: {0}")]
    InvalidUsername(String),
    #[error("다른 요청이 먼저 프로필을 수정했습니다")]
    Conflict,
    #[error("이미 사용 중인 사용자 이름입니다")]
    UsernameTaken,
    #[error("사용자를 찾을 수 없습니다")]
    NotFound,
    #[error("저장소 에러: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ProfileError::Conflict,
            StoreError::UsernameTaken => ProfileError::UsernameTaken,
            StoreError::NotFound => ProfileError::NotFound,
            other => ProfileError::Store(other),
        }
    }
}

impl ProfileError {
    /// 짧은 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ProfileError::InvalidUsername(_) => "INVALID_USERNAME",
            ProfileError::Conflict => "CONFLICT",
            ProfileError::UsernameTaken => "USERNAME_TAKEN",
            ProfileError::NotFound => "USER_NOT_FOUND",
            ProfileError::Store(_) => "STORE_UNAVAILABLE",
        }
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> u16 {
        match self {
            ProfileError::InvalidUsername(_) => 400,
            ProfileError::Conflict | ProfileError::UsernameTaken => 409,
            ProfileError::NotFound => 404,
            ProfileError::Store(_) => 503,
        }
    }
}

/// 사용자 이름 정규화 및 형식 검사.
///
/// 앞뒤 공백을 잘라낸 이름을 반환합니다.
pub fn validate_username(username: &str) -> Result<&str, ProfileError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ProfileError::InvalidUsername("empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ProfileError::InvalidUsername(format!(
            "longer than {} characters",
            MAX_USERNAME_LEN
        )));
    }
    Ok(username)
}

/// 프로필 서비스.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn CredentialStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// 사용자 이름 변경.
    ///
    /// 새 이름은 앞뒤 공백을 잘라 저장합니다. `identity`의 현재 이름을
    /// 기대값으로 써서 `id` 기준으로 갱신하고, 성공하면 갱신된 신원을
    /// 반환합니다.
    pub async fn update_username(
        &self,
        identity: &Identity,
        new_username: &str,
    ) -> Result<Identity, ProfileError> {
        let new_username = validate_username(new_username)?;

        if identity.username == new_username {
            return Ok(identity.clone());
        }

        match self
            .store
            .compare_and_set_username(identity.id, &identity.username, new_username)
            .await
        {
            Ok(updated) => {
                info!(
                    user_id = updated.id,
                    old = %identity.username,
                    new = %updated.username,
                    "Username updated"
                );
                Ok(updated)
            }
            Err(err) => {
                warn!(user_id = identity.id, error = %err, "Username update rejected");
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for ProfileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileService").finish_non_exhaustive()
    }
}
