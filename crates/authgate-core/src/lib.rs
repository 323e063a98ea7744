//! # Authgate Core
//!
//! 요청 자격증명을 신원으로 확인하고 접근 게이트로 허용/거부를 결정하는
//! 파이프라인을 제공합니다.
//!
//! 이 크레이트는 HTTP 프레임워크에 의존하지 않습니다:
//! - 신원/역할 도메인 타입
//! - 토큰 서명/검증, 자격증명 추출, 신원 확인, 접근 게이트
//! - 자격증명 저장소 trait 및 메모리 구현
//! - 로그인/프로필 수정 서비스
//! - 설정 관리와 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod password;
pub mod pipeline;
pub mod services;
pub mod store;

pub use config::{AppConfig, AuthConfig, ConfigError, LoggingConfig, ServerConfig};
pub use domain::*;
pub use error::*;
pub use logging::{init_logging, redact, LogConfig, LogFormat};
pub use password::{hash_password, verify_password, PasswordError};
pub use pipeline::*;
pub use services::*;
pub use store::{CredentialStore, InMemoryCredentialStore, StoreStats};
