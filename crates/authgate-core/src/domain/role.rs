//! 사용자 역할.
//!
//! 역할 게이트는 계층 없이 역할 일치 여부만 비교합니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자
    Admin,
    /// 일반 사용자
    Basic,
}

impl Role {
    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "basic" => Some(Role::Basic),
            _ => None,
        }
    }

    /// 메트릭/로그 라벨용 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Basic => "basic",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
