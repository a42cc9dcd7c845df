//! Bearer-token resolution for the HTTP API.
//!
//! Tokens are configured as hex SHA-256 digests; the plaintext never
//! touches disk. A request without a token is anonymous. A token that
//! matches nothing is rejected rather than downgraded.

use sha2::{Digest, Sha256};

use docbase_core::auth::Actor;

use crate::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    Unknown,
}

/// Hex SHA-256 of a token, the form stored in `[[auth.tokens]]`.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// The CLI runs with the operator's own authority.
pub fn local_actor() -> Actor {
    let user = std::env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "local".to_string());
    Actor::admin(user)
}

/// Resolve an `Authorization` header value to an [`Actor`].
pub fn resolve_actor(auth: &AuthConfig, header: Option<&str>) -> Result<Actor, TokenError> {
    let header = match header {
        Some(h) => h.trim(),
        None => return Ok(Actor::anonymous()),
    };
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::Malformed)?;

    let digest = token_digest(token);
    auth.tokens
        .iter()
        .find(|t| t.sha256.eq_ignore_ascii_case(&digest))
        .map(|t| Actor {
            user_id: Some(t.user_id.clone()),
            role: t.role,
        })
        .ok_or(TokenError::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use docbase_core::auth::Role;

    fn auth() -> AuthConfig {
        AuthConfig {
            tokens: vec![
                TokenConfig {
                    user_id: "alice".into(),
                    role: Role::Admin,
                    sha256: token_digest("admin-secret"),
                },
                TokenConfig {
                    user_id: "bob".into(),
                    role: Role::Reader,
                    sha256: token_digest("reader-secret").to_uppercase(),
                },
            ],
        }
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        assert_eq!(
            token_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_local_actor_can_write() {
        assert!(local_actor().can_write());
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        assert_eq!(resolve_actor(&auth(), None), Ok(Actor::anonymous()));
    }

    #[test]
    fn test_known_tokens_resolve() {
        let admin = resolve_actor(&auth(), Some("Bearer admin-secret")).unwrap();
        assert_eq!(admin, Actor::admin("alice"));
        let reader = resolve_actor(&auth(), Some("Bearer reader-secret")).unwrap();
        assert_eq!(reader, Actor::reader("bob"));
    }

    #[test]
    fn test_bad_tokens_rejected() {
        assert_eq!(
            resolve_actor(&auth(), Some("Bearer nope")),
            Err(TokenError::Unknown)
        );
        assert_eq!(
            resolve_actor(&auth(), Some("Basic abc")),
            Err(TokenError::Malformed)
        );
        assert_eq!(
            resolve_actor(&auth(), Some("Bearer ")),
            Err(TokenError::Malformed)
        );
    }
}
