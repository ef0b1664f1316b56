pub mod jwks;
pub mod jwt;
pub mod middleware;

use jsonwebtoken::DecodingKey;
use thiserror::Error;

use crate::config::AuthConfig;
use jwks::JwksCache;
use jwt::Claims;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("failed to load signing keys: {0}")]
    KeyFetch(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(err.to_string()),
        }
    }
}

/// Verifies admin bearer tokens.
pub enum TokenVerifier {
    Jwks(JwksCache),
    Secret(DecodingKey),
}

impl TokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config {
            AuthConfig::Jwks { url, api_key } => {
                TokenVerifier::Jwks(JwksCache::new(url, api_key.as_deref()))
            }
            AuthConfig::Secret(secret) => Self::hs256(secret),
        }
    }

    pub fn hs256(secret: &str) -> Self {
        TokenVerifier::Secret(DecodingKey::from_secret(secret.as_bytes()))
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await,
            TokenVerifier::Secret(key) => jwt::decode_hs256(token, key),
        }
    }
}

/// Extracts the token of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(Some("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }
}
