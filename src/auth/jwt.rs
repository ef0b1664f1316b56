use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use super::{AuthError, TokenVerifier};

/// Claims read from an admin token. Only `sub` and `exp` are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub(crate) fn validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}

pub(crate) fn decode_hs256(token: &str, key: &DecodingKey) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(token, key, &validation(Algorithm::HS256))?;
    Ok(data.claims)
}

/// Validate a bearer token and return its claims.
pub async fn validate_token(token: &str, verifier: &TokenVerifier) -> Result<Claims, AuthError> {
    verifier.verify(token).await
}
