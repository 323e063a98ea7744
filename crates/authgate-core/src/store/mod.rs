//! 자격증명 저장소.
//!
//! 파이프라인은 조회 기능만 필요합니다. 저장소 인스턴스는 생성 시점에
//! 주입되며 전역 상태를 두지 않습니다.

mod memory;

use async_trait::async_trait;

use crate::domain::{Identity, UserId};
use crate::error::StoreResult;

pub use memory::{InMemoryCredentialStore, StoreStats};

/// 사용자 조회 및 단일 갱신 연산.
///
/// 조회 결과 "없음"은 `Ok(None)`이며, `Err`는 저장소 장애를 뜻합니다.
/// 네트워크 저장소라면 각 조회가 중단 지점이 됩니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 사용자 이름으로 조회.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>>;

    /// 사용자 ID로 조회.
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<Identity>>;

    /// 레거시 시크릿으로 조회.
    async fn find_by_secret(&self, secret: &str) -> StoreResult<Option<Identity>>;

    /// 사용자 이름 compare-and-swap.
    ///
    /// 현재 이름이 `expected`일 때만 `new_username`으로 바꿉니다.
    /// 다른 쓰기가 먼저 반영되었으면 `Conflict`, 이름이 이미 쓰이고 있으면
    /// `UsernameTaken`을 반환합니다.
    async fn compare_and_set_username(
        &self,
        id: UserId,
        expected: &str,
        new_username: &str,
    ) -> StoreResult<Identity>;
}
