//! 세션 쿠키 헤더 값.
//!
//! `token` 쿠키는 HttpOnly, SameSite=Strict이며 수명은 토큰 TTL과 같습니다.

use authgate_core::TOKEN_COOKIE;

/// 토큰을 담는 `Set-Cookie` 값.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };

    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        TOKEN_COOKIE, token, max_age_secs, secure_flag
    )
}

/// `token` 쿠키를 지우는 `Set-Cookie` 값.
///
/// 이미 발급된 토큰은 만료 전까지 여전히 유효합니다.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
