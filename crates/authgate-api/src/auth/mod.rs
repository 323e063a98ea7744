//! 인증 및 권한 부여.
//!
//! 요청마다 코어 파이프라인(추출 → 확인 → 게이트)을 실행하는 추출기와
//! 세션 쿠키 헬퍼를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`OptionalAuth`], [`RequiredAuth`], [`AdminAuth`]: JWT 전략 추출기
//! - [`SecretAuth`]: 레거시 시크릿 전략 추출기
//! - [`session_cookie`]: 로그인 응답의 `Set-Cookie` 값

mod cookie;
mod extractors;

pub use cookie::{clear_session_cookie, session_cookie};
pub use extractors::{AdminAuth, OptionalAuth, RequestCredentials, RequiredAuth, SecretAuth};
