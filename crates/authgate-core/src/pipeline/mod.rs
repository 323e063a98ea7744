//! 신원 확인 및 접근 게이트 파이프라인.
//!
//! 요청 → [`extractor`] → [`resolver`] ([`token`] / 저장소) → [`gate`] 순서로
//! 한 방향으로만 흐릅니다. 각 단계는 값을 반환할 뿐 프레임워크를 호출하지
//! 않습니다.

pub mod extractor;
pub mod gate;
pub mod resolver;
pub mod token;

pub use extractor::{
    extract, parse_bearer, AuthStrategy, CredentialCandidate, CredentialSource,
    StaticCredentials, SECRET_COOKIE, TOKEN_COOKIE,
};
pub use gate::{Gate, GateOutcome, OptionalGate, RequiredGate, RoleGate};
pub use resolver::{
    resolve_request, JwtVerifier, LegacySecretVerifier, Resolution, Verifier,
    DEFAULT_LOOKUP_TIMEOUT,
};
pub use token::{Claims, IssuedToken, SigningError, TokenCodec, VerificationError};

/// 추출, 확인, 게이트 결정을 한 번에 수행합니다.
pub async fn authorize<V, G, S>(verifier: &V, gate: &G, source: &S) -> GateOutcome
where
    V: Verifier + ?Sized,
    G: Gate + ?Sized,
    S: CredentialSource + ?Sized,
{
    let resolution = resolve_request(verifier, source).await;
    gate.decide(&resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::error::AuthError;
    use crate::store::{CredentialStore, InMemoryCredentialStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_authorize_end_to_end() {
        let store = Arc::new(InMemoryCredentialStore::with_demo_users().unwrap());
        let codec = TokenCodec::new(
            b"pipeline-test-secret-key-at-least-32-bytes",
            "authgate",
            "authgate-users",
            chrono::Duration::hours(1),
        );
        let verifier = JwtVerifier::new(codec.clone(), store.clone());

        let admin = store.find_by_username("admin").await.unwrap().unwrap();
        let user = store.find_by_username("user").await.unwrap().unwrap();
        let admin_token = codec.sign(&admin).unwrap().token;
        let user_token = codec.sign(&user).unwrap().token;

        let admin_req = StaticCredentials::new().with_cookie(TOKEN_COOKIE, admin_token);
        let outcome = authorize(&verifier, &RoleGate::new(Role::Admin), &admin_req).await;
        assert_eq!(outcome.into_result().unwrap().unwrap().role, Role::Admin);

        let user_req = StaticCredentials::new().with_bearer(&user_token);
        let denied = authorize(&verifier, &RoleGate::new(Role::Admin), &user_req)
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(denied.error, AuthError::WrongRole);

        let anonymous = StaticCredentials::new();
        let denied = authorize(&verifier, &RequiredGate, &anonymous)
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(denied.reason, "no token provided");
        assert_eq!(
            authorize(&verifier, &OptionalGate, &anonymous).await,
            GateOutcome::Proceed(None)
        );
    }
}
