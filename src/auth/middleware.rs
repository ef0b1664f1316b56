use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use crate::auth::{TokenVerifier, bearer_token, jwt};
use crate::error::ApiError;

/// An administrator authenticated by bearer token.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub subject: String,
    pub email: Option<String>,
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            let token = bearer_token(header_value).ok_or_else(|| {
                ApiError::Forbidden("Missing Authorization Credentials".to_string())
            })?;

            let verifier = req
                .app_data::<web::Data<TokenVerifier>>()
                .ok_or_else(|| ApiError::Internal("Token verifier not configured".to_string()))?;

            let claims = jwt::validate_token(token, verifier.get_ref()).await?;

            Ok(AdminUser {
                subject: claims.sub,
                email: claims.email,
            })
        })
    }
}
