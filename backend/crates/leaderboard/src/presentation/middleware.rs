//! Identity Middleware
//!
//! The leaderboard never manages credentials. An external identity provider
//! authenticates users and sets a cookie holding `base64(user_uuid || hmac)`,
//! signed with a secret shared with this service. The middleware verifies the
//! signature statelessly and injects the user's ID into the request.

use crate::application::config::LeaderboardConfig;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;
use std::sync::Arc;
use uuid::Uuid;

/// The authenticated user's ID, injected into request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

/// Middleware state
#[derive(Clone)]
pub struct IdentityState {
    pub config: Arc<LeaderboardConfig>,
}

/// Middleware that requires a valid identity cookie
pub async fn require_identity(
    State(state): State<IdentityState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.identity_cookie_name);

    let Some(token) = token else {
        tracing::debug!("No identity cookie");
        return Err((StatusCode::UNAUTHORIZED, ()).into_response());
    };

    match verify_identity_token(&token, &state.config.identity_secret) {
        Some(user_id) => {
            req.extensions_mut().insert(AuthenticatedUser(user_id));
            Ok(next.run(req).await)
        }
        None => {
            tracing::warn!("Invalid identity token");
            Err((StatusCode::UNAUTHORIZED, ()).into_response())
        }
    }
}

/// Create a signed identity token (what the identity provider issues)
pub fn issue_identity_token(user_id: UserId, secret: &[u8; 32]) -> String {
    let id_bytes = user_id.as_uuid().as_bytes();
    let signature = platform::crypto::hmac_sha256(secret, id_bytes);
    let mut token_data = Vec::with_capacity(16 + 32);
    token_data.extend_from_slice(id_bytes);
    token_data.extend_from_slice(&signature);
    platform::crypto::to_base64(&token_data)
}

/// Verify and extract the user ID from a signed identity token
pub fn verify_identity_token(token: &str, secret: &[u8; 32]) -> Option<UserId> {
    let token_data = platform::crypto::from_base64(token).ok()?;
    if token_data.len() != 48 {
        // 16 (UUID) + 32 (HMAC)
        return None;
    }

    let id_bytes: [u8; 16] = token_data[0..16].try_into().ok()?;
    let provided_signature: &[u8] = &token_data[16..48];

    let expected_signature = platform::crypto::hmac_sha256(secret, &id_bytes);

    // Constant-time comparison
    if !platform::crypto::constant_time_eq(provided_signature, &expected_signature) {
        return None;
    }

    Some(UserId::from_uuid(Uuid::from_bytes(id_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_token_roundtrip() {
        let secret = [7u8; 32];
        let user_id = UserId::new();

        let token = issue_identity_token(user_id, &secret);
        assert_eq!(verify_identity_token(&token, &secret), Some(user_id));
    }

    #[test]
    fn test_identity_token_wrong_secret() {
        let user_id = UserId::new();
        let token = issue_identity_token(user_id, &[7u8; 32]);
        assert_eq!(verify_identity_token(&token, &[8u8; 32]), None);
    }

    #[test]
    fn test_identity_token_tampered() {
        let secret = [7u8; 32];
        let token = issue_identity_token(UserId::new(), &secret);

        let mut data = platform::crypto::from_base64(&token).unwrap();
        data[0] ^= 0xFF;
        let tampered = platform::crypto::to_base64(&data);

        assert_eq!(verify_identity_token(&tampered, &secret), None);
    }

    #[test]
    fn test_identity_token_garbage() {
        let secret = [7u8; 32];
        assert_eq!(verify_identity_token("", &secret), None);
        assert_eq!(verify_identity_token("not base64 !!!", &secret), None);
        assert_eq!(
            verify_identity_token(&platform::crypto::to_base64(b"short"), &secret),
            None
        );
    }
}
