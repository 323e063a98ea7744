//! 접근 게이트.
//!
//! 게이트는 [`Resolution`]을 받아 진행/거부를 결정하는 순수 함수입니다.
//! 호출 간 상태가 없으므로 같은 입력이면 항상 같은 결정이 나옵니다.

use crate::domain::{Identity, Role};
use crate::error::{AuthError, Rejection};

use super::resolver::Resolution;

/// 게이트 결정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// 진행. 확인된 신원이 있으면 함께 전달됩니다.
    Proceed(Option<Identity>),
    /// 거부.
    Deny(Rejection),
}

impl GateOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateOutcome::Proceed(_))
    }

    /// 결과를 `Result`로 변환. 진행이지만 신원이 없으면 `Ok(None)`.
    pub fn into_result(self) -> Result<Option<Identity>, Rejection> {
        match self {
            GateOutcome::Proceed(identity) => Ok(identity),
            GateOutcome::Deny(rejection) => Err(rejection),
        }
    }
}

/// 접근 정책.
pub trait Gate: Send + Sync {
    fn decide(&self, resolution: &Resolution) -> GateOutcome;
}

/// 항상 진행. 인증 실패는 익명으로 취급합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalGate;

impl Gate for OptionalGate {
    fn decide(&self, resolution: &Resolution) -> GateOutcome {
        GateOutcome::Proceed(resolution.identity().cloned())
    }
}

/// 인증 필수. 거부 사유는 바꾸지 않고 그대로 전달합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredGate;

impl Gate for RequiredGate {
    fn decide(&self, resolution: &Resolution) -> GateOutcome {
        match resolution {
            Resolution::Authenticated(identity) => GateOutcome::Proceed(Some(identity.clone())),
            Resolution::Rejected(rejection) => GateOutcome::Deny(rejection.clone()),
        }
    }
}

/// 특정 역할 필수.
///
/// 인증 실패(401)는 그대로 전달하고, 역할 불일치는 403으로 따로 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    role: Role,
}

impl RoleGate {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl Gate for RoleGate {
    fn decide(&self, resolution: &Resolution) -> GateOutcome {
        match RequiredGate.decide(resolution) {
            GateOutcome::Proceed(Some(identity)) if identity.role != self.role => {
                GateOutcome::Deny(Rejection::new(AuthError::WrongRole, "insufficient role"))
            }
            outcome => outcome,
        }
    }
}
