//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `AUTHGATE__SECTION__KEY` 환경 변수 순으로
//! 덮어씁니다.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// 최소 JWT 시크릿 길이 (바이트).
pub const MIN_SECRET_LEN: usize = 32;

/// 설정 에러.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),
    #[error("잘못된 설정: {0}")]
    Invalid(String),
}

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 자격 증명(쿠키) 포함 요청을 허용할 origin 목록
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_origins: Vec::new(),
        }
    }
}

/// 인증 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 토큰 서명 키. 없으면 개발용 키로 대체됩니다.
    #[serde(deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
    /// 토큰 유효 시간 (초)
    pub token_ttl_secs: u64,
    /// 토큰 발급자 (iss)
    pub issuer: String,
    /// 토큰 대상 (aud)
    pub audience: String,
    /// 저장소 조회 타임아웃 (밀리초)
    pub lookup_timeout_ms: u64,
    /// 쿠키에 Secure 플래그 설정 여부
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 3600,
            issuer: "authgate".to_string(),
            audience: "authgate-users".to_string(),
            lookup_timeout_ms: 2000,
            cookie_secure: false,
        }
    }
}

impl AuthConfig {
    /// 명시적 시크릿으로 설정 생성 (테스트 및 임베딩용).
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(SecretString::new(secret.into().into())),
            ..Default::default()
        }
    }

    /// 시크릿이 설정되어 있는지 확인.
    pub fn has_secret(&self) -> bool {
        self.jwt_secret.is_some()
    }

    /// 설정값 검증.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_secs must be > 0".into()));
        }
        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth.issuer and auth.audience must not be empty".into(),
            ));
        }
        if let Some(secret) = &self.jwt_secret {
            if secret.expose_secret().len() < MIN_SECRET_LEN {
                return Err(ConfigError::Invalid(format!(
                    "auth.jwt_secret must be at least {} bytes",
                    MIN_SECRET_LEN
                )));
            }
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::new(s.into())))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("AUTHGATE")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다. 파일이 없어도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(environment())
            .build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.auth.validate()?;
        Ok(app)
    }

    /// 환경 변수만으로 설정을 로드합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = config::Config::builder().add_source(environment()).build()?;

        let app: AppConfig = config.try_deserialize()?;
        app.auth.validate()?;
        Ok(app)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("config/default.toml")
    }
}
