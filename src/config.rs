use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_MAX_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not valid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// How bearer tokens are verified.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Signing keys served by a JWKS endpoint. `api_key` is sent as the `apikey` header.
    Jwks { url: String, api_key: Option<String> },
    /// Shared HS256 secret.
    Secret(String),
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub app_env: String,
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = parse_or("PORT", DEFAULT_PORT)?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));
        let upload_max_bytes = parse_or("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?;

        let auth = match (env::var("AUTH_JWKS_URL"), env::var("AUTH_JWT_SECRET")) {
            (Ok(url), _) => AuthConfig::Jwks {
                url,
                api_key: env::var("AUTH_API_KEY").ok(),
            },
            (Err(_), Ok(secret)) => AuthConfig::Secret(secret),
            _ => return Err(ConfigError::Missing("AUTH_JWKS_URL or AUTH_JWT_SECRET")),
        };

        Ok(Self {
            database_url,
            port,
            app_env: environment().to_string(),
            public_base_url,
            upload_dir,
            upload_max_bytes,
            auth,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

static ENVIRONMENT: OnceLock<String> = OnceLock::new();

/// `APP_ENV`, defaulting to `development`.
pub fn environment() -> &'static str {
    ENVIRONMENT.get_or_init(|| env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
}

pub fn is_production() -> bool {
    environment() == "production"
}
