//! 로그인과 프로필 수정 서비스.

pub mod login;
pub mod profile;

pub use login::{Authenticator, LoginError, LoginOutcome};
pub use profile::{validate_username, ProfileError, ProfileService, MAX_USERNAME_LEN};
