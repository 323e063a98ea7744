//! 도메인 타입.

mod identity;
mod role;

pub use identity::{digest_secret, Identity, PublicIdentity, UserId};
pub use role::Role;
