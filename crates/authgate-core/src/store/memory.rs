//! 메모리 기반 자격증명 저장소.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::CredentialStore;
use crate::domain::{Identity, Role, UserId};
use crate::error::{StoreError, StoreResult};
use crate::password::PasswordError;

/// 역할별 사용자 수.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_users: usize,
    pub admins: usize,
    pub basics: usize,
}

/// `RwLock<HashMap>` 기반 저장소.
///
/// 조회는 공유 락, 갱신은 쓰기 락 안에서 한 번에 처리됩니다.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, Identity>>,
}

impl InMemoryCredentialStore {
    /// 빈 저장소.
    pub fn new() -> Self {
        Self::default()
    }

    /// 주어진 신원들로 초기화.
    pub fn with_identities(identities: impl IntoIterator<Item = Identity>) -> Self {
        let users = identities.into_iter().map(|i| (i.id, i)).collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// 데모 사용자 두 명으로 초기화.
    ///
    /// - `admin` / `admin123` (admin, 시크릿 `admin-secret-123`)
    /// - `user` / `user123` (basic, 시크릿 `user-secret-456`)
    pub fn with_demo_users() -> Result<Self, PasswordError> {
        let created_at = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Ok(Self::with_identities([
            Identity::new(1, "admin", Role::Admin, "admin123", "admin-secret-123", created_at)?,
            Identity::new(2, "user", Role::Basic, "user123", "user-secret-456", created_at)?,
        ]))
    }

    /// 신원 추가. 같은 ID가 있으면 교체합니다.
    pub async fn insert(&self, identity: Identity) {
        self.users.write().await.insert(identity.id, identity);
    }

    /// 신원 삭제.
    pub async fn remove(&self, id: UserId) -> Option<Identity> {
        self.users.write().await.remove(&id)
    }

    /// 역할 변경.
    pub async fn set_role(&self, id: UserId, role: Role) -> StoreResult<Identity> {
        let mut users = self.users.write().await;
        let identity = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        identity.role = role;
        Ok(identity.clone())
    }

    /// 사용자 수.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// 역할별 통계.
    pub async fn stats(&self) -> StoreStats {
        let users = self.users.read().await;
        let admins = users.values().filter(|u| u.role == Role::Admin).count();
        StoreStats {
            total_users: users.len(),
            admins,
            basics: users.len() - admins,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<Identity>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_secret(&self, secret: &str) -> StoreResult<Option<Identity>> {
        let users = self.users.read().await;
        // 일치 여부와 무관하게 모든 레코드를 비교합니다.
        let mut found = None;
        for user in users.values() {
            if user.matches_secret(secret) && found.is_none() {
                found = Some(user.clone());
            }
        }
        Ok(found)
    }

    async fn compare_and_set_username(
        &self,
        id: UserId,
        expected: &str,
        new_username: &str,
    ) -> StoreResult<Identity> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.id != id && u.username == new_username)
        {
            return Err(StoreError::UsernameTaken);
        }

        let identity = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if identity.username != expected {
            return Err(StoreError::Conflict);
        }

        identity.username = new_username.to_string();
        Ok(identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digest_secret;
    use std::sync::Arc;

    fn fixture() -> InMemoryCredentialStore {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        InMemoryCredentialStore::with_identities([
            Identity::from_stored(1, "admin", Role::Admin, "h1", digest_secret("s1"), created_at),
            Identity::from_stored(2, "user", Role::Basic, "h2", digest_secret("s2"), created_at),
        ])
    }

    #[tokio::test]
    async fn test_lookups() {
        let store = fixture();

        assert_eq!(store.find_by_username("admin").await.unwrap().unwrap().id, 1);
        assert_eq!(store.find_by_id(2).await.unwrap().unwrap().username, "user");
        assert_eq!(store.find_by_secret("s2").await.unwrap().unwrap().id, 2);

        assert!(store.find_by_username("nobody").await.unwrap().is_none());
        assert!(store.find_by_id(99).await.unwrap().is_none());
        assert!(store.find_by_secret("s3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_compare_and_set_username() {
        let store = fixture();

        let updated = store.compare_and_set_username(2, "user", "bob").await.unwrap();
        assert_eq!(updated.username, "bob");
        assert_eq!(updated.id, 2);
        assert!(store.find_by_username("user").await.unwrap().is_none());

        // 오래된 기대값으로는 실패
        let stale = store.compare_and_set_username(2, "user", "carol").await;
        assert_eq!(stale.unwrap_err(), StoreError::Conflict);

        let taken = store.compare_and_set_username(2, "bob", "admin").await;
        assert_eq!(taken.unwrap_err(), StoreError::UsernameTaken);

        let missing = store.compare_and_set_username(42, "x", "y").await;
        assert_eq!(missing.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_concurrent_renames_single_winner() {
        let store = Arc::new(fixture());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .compare_and_set_username(2, "user", &format!("name-{}", i))
                        .await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert_eq!(e, StoreError::Conflict),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_admin_operations() {
        let store = fixture();

        let demoted = store.set_role(1, Role::Basic).await.unwrap();
        assert_eq!(demoted.role, Role::Basic);
        assert_eq!(
            store.stats().await,
            StoreStats {
                total_users: 2,
                admins: 0,
                basics: 2
            }
        );

        assert!(store.remove(1).await.is_some());
        assert_eq!(store.len().await, 1);
        assert!(store.find_by_id(1).await.unwrap().is_none());
        assert_eq!(store.set_role(1, Role::Admin).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_demo_users() {
        let store = InMemoryCredentialStore::with_demo_users().unwrap();
        let admin = store.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(crate::password::verify_password("admin123", admin.password_hash()).is_ok());
        assert_eq!(
            store.find_by_secret("user-secret-456").await.unwrap().unwrap().username,
            "user"
        );
    }
}
