use serde_json::json;

use crate::response::{ApiResult, ok};

/// GET /api/status: liveness probe.
pub async fn status() -> ApiResult {
    ok(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
