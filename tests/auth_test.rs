//! Integration tests for bearer token verification.
//!
//! Tokens are minted locally with an HS256 secret and checked through the
//! same `TokenVerifier` the server uses. No server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use showcase_admin::auth::jwt::{Claims, validate_token};
use showcase_admin::auth::{AuthError, TokenVerifier};
use showcase_admin::error::ApiError;

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims(sub: &str, exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: sub.to_string(),
        exp: (now + exp_offset) as usize,
        iat: Some(now as usize),
        iss: Some("https://auth.example.com".to_string()),
        email: Some("admin@example.com".to_string()),
        role: Some("admin".to_string()),
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[tokio::test]
async fn test_valid_token_decodes_correctly() {
    let sub = Uuid::new_v4().to_string();
    let token = mint(&claims(&sub, 3600), TEST_SECRET);

    let verifier = TokenVerifier::hs256(TEST_SECRET);
    let decoded = validate_token(&token, &verifier)
        .await
        .expect("Token should be valid");

    assert_eq!(decoded.sub, sub);
    assert_eq!(decoded.email.as_deref(), Some("admin@example.com"));
}

#[tokio::test]
async fn test_expired_token_is_reported_as_expired() {
    let token = mint(&claims("someone", -300), TEST_SECRET);

    let err = TokenVerifier::hs256(TEST_SECRET)
        .verify(&token)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Expired));
    assert_eq!(
        ApiError::from(err).to_string(),
        "Token has expired, please re-authenticate"
    );
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let token = mint(&claims("someone", 3600), TEST_SECRET);

    let err = TokenVerifier::hs256("completely-wrong-secret-xxxxxxxxxxxxxxxxxxx")
        .verify(&token)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Invalid(_)));
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let err = TokenVerifier::hs256(TEST_SECRET)
        .verify("not.a.valid.jwt")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Invalid(_)));
    assert_eq!(
        ApiError::from(err).to_string(),
        "Invalid token, please re-authenticate"
    );
}
