use actix_web::HttpResponse;
use serde::Serialize;

use crate::error::ApiError;

pub type ApiResult = Result<HttpResponse, ApiError>;

/// Success envelope: `{ "payload": ... }`.
#[derive(Debug, Serialize)]
pub struct Payload<T> {
    pub payload: T,
}

pub fn ok<T: Serialize>(payload: T) -> ApiResult {
    Ok(HttpResponse::Ok().json(Payload { payload }))
}
