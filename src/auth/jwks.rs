use jsonwebtoken::{Algorithm, DecodingKey, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use tracing::debug;

use super::AuthError;
use super::jwt::{Claims, validation};

#[derive(Clone, Debug, PartialEq)]
enum KeyMaterial {
    Ec { x: String, y: String },
    Rsa { n: String, e: String },
}

#[derive(Clone, Debug)]
struct JwksKeyData {
    material: KeyMaterial,
    algorithm: Algorithm,
}

impl JwksKeyData {
    fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        let key = match &self.material {
            KeyMaterial::Ec { x, y } => DecodingKey::from_ec_components(x, y),
            KeyMaterial::Rsa { n, e } => DecodingKey::from_rsa_components(n, e),
        };
        key.map_err(|e| AuthError::Invalid(format!("Failed to create decoding key: {e}")))
    }
}

/// Signing keys of a JWKS endpoint, cached by `kid` for an hour.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    client: reqwest::Client,
    api_key: Option<String>,
}

impl JwksCache {
    pub fn new(jwks_url: &str, api_key: Option<&str>) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            api_key: api_key.map(str::to_string),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, AuthError> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let mut request = self.client.get(&self.jwks_url);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("Failed to fetch JWKS: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetch(format!(
                "Failed to fetch JWKS: HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("Failed to parse JWKS JSON: {e}")))
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, AuthError> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let key_data = find_key(&jwks, kid)?;

        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::Invalid("No 'kid' in token header".to_string()))?;

        let key_data = self.get_key_data(&kid).await?;
        let decoding_key = key_data.decoding_key()?;

        let data = decode::<Claims>(token, &decoding_key, &validation(key_data.algorithm))?;
        Ok(data.claims)
    }
}

fn find_key(jwks: &serde_json::Value, kid: &str) -> Result<JwksKeyData, AuthError> {
    let keys = jwks["keys"]
        .as_array()
        .ok_or_else(|| AuthError::KeyFetch("No keys in JWKS".to_string()))?;

    let key = keys
        .iter()
        .find(|k| k["kid"].as_str() == Some(kid))
        .ok_or_else(|| AuthError::Invalid(format!("Key with kid={kid} not found in JWKS")))?;

    let field = |name: &str| {
        key[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AuthError::Invalid(format!("Missing '{name}' in JWK")))
    };

    let (material, default_alg) = match key["kty"].as_str().unwrap_or("EC") {
        "RSA" => (
            KeyMaterial::Rsa {
                n: field("n")?,
                e: field("e")?,
            },
            Algorithm::RS256,
        ),
        "EC" => (
            KeyMaterial::Ec {
                x: field("x")?,
                y: field("y")?,
            },
            Algorithm::ES256,
        ),
        other => return Err(AuthError::Invalid(format!("Unsupported key type {other}"))),
    };

    let algorithm = match key["alg"].as_str() {
        Some("ES256") => Algorithm::ES256,
        Some("ES384") => Algorithm::ES384,
        Some("RS256") => Algorithm::RS256,
        Some("RS384") => Algorithm::RS384,
        Some("RS512") => Algorithm::RS512,
        _ => default_alg,
    };

    Ok(JwksKeyData { material, algorithm })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_ec_and_rsa_keys_by_kid() {
        let jwks = json!({
            "keys": [
                { "kid": "ec-1", "kty": "EC", "x": "xx", "y": "yy", "alg": "ES256" },
                { "kid": "rsa-1", "kty": "RSA", "n": "nn", "e": "AQAB" }
            ]
        });

        let ec = find_key(&jwks, "ec-1").unwrap();
        assert_eq!(
            ec.material,
            KeyMaterial::Ec {
                x: "xx".to_string(),
                y: "yy".to_string()
            }
        );
        assert_eq!(ec.algorithm, Algorithm::ES256);

        let rsa = find_key(&jwks, "rsa-1").unwrap();
        assert_eq!(rsa.algorithm, Algorithm::RS256);
    }

    #[test]
    fn unknown_kid_is_an_invalid_token() {
        let jwks = json!({ "keys": [] });
        assert!(matches!(
            find_key(&jwks, "missing"),
            Err(AuthError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_document_is_a_fetch_failure() {
        assert!(matches!(
            find_key(&json!({}), "any"),
            Err(AuthError::KeyFetch(_))
        ));
    }
}
