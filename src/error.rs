use std::collections::BTreeMap;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::config;

/// Every failure a handler can return. Rendered as the `{ "error": ... }` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingParameters(String),
    #[error("Invalid parameters")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    InvalidDate(String),
    #[error("{0}")]
    InvalidFile(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Something went wrong while accessing the database")]
    Database(DbErr),
    #[error("Something went wrong while accessing file storage")]
    Storage(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn application_code(&self) -> &'static str {
        match self {
            ApiError::MissingParameters(_) => "missing-parameters",
            ApiError::Validation(_) => "invalid-parameters",
            ApiError::InvalidDate(_) => "invalid-date",
            ApiError::InvalidFile(_) => "invalid-file",
            ApiError::BadRequest(_) => "bad-request",
            ApiError::NotFound(_) => "not-found",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Database(_) => "database-error",
            ApiError::Storage(_) => "storage-error",
            ApiError::Internal(_) => "internal-error",
        }
    }

    fn fields(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let ApiError::Validation(errors) = self else {
            return None;
        };
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Some(fields)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => ApiError::NotFound(message),
            DbErr::RecordNotUpdated => ApiError::NotFound("Record not found".to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired => {
                ApiError::Unauthorized("Token has expired, please re-authenticate".to_string())
            }
            AuthError::Invalid(_) => {
                ApiError::Unauthorized("Invalid token, please re-authenticate".to_string())
            }
            AuthError::KeyFetch(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    status: u16,
    application_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameters(_)
            | ApiError::Validation(_)
            | ApiError::InvalidDate(_)
            | ApiError::InvalidFile(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                message: self.to_string(),
                status: status.as_u16(),
                application_code: self.application_code(),
                fields: self.fields(),
                stack: (!config::is_production()).then(|| format!("{self:?}")),
            },
        };
        HttpResponse::build(status).json(body)
    }
}

/// `JsonConfig` error handler: malformed or incomplete bodies use the error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(e) => ApiError::MissingParameters(e.to_string()),
        other => ApiError::BadRequest(other.to_string()),
    }
    .into()
}

/// `PathConfig` error handler: a malformed id never matches a resource.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!("rejected path: {err}");
    ApiError::NotFound("Resource not found".to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}
