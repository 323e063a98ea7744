//! 비밀번호 해싱.
//!
//! 평문 비교 대신 Argon2id 해시와 솔트를 사용합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 존재하지 않는 사용자의 로그인 시 검증 비용을 맞추기 위한 해시.
///
/// [`hash_password`]와 같은 기본 파라미터를 쓰며, 어떤 비밀번호와도
/// 일치하지 않습니다.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$yCT1gk5qZVI5gitwC53fHw$i7fjsay7KShQRejzPtP/xP4zYYOoKqaPYjNhQAGcJVk";

/// 비밀번호를 PHC 형식 argon2id 해시로 변환합니다.
///
/// ```rust,ignore
/// let hash = hash_password("admin123")?;
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 저장된 해시와 입력 비밀번호를 비교합니다.
///
/// 일치하면 `Ok(())`, 불일치하면 `VerificationFailed`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}
