//! Liveness endpoints

use crate::api::types::{BANNER, HealthResponse};
use axum::Json;

/// GET /
pub async fn index() -> &'static str {
    BANNER
}

/// GET /health
///
/// Constant payload; does not depend on targets or the network
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
