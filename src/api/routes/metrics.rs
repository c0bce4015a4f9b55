//! Metrics exposition endpoint

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::api::{error::ApiResult, state::ApiState};

/// GET /metrics
///
/// Returns the store's export verbatim as plain text
pub async fn get_metrics(State(state): State<ApiState>) -> ApiResult<Response> {
    let metrics = state.metrics();
    let body = metrics.export()?;

    Ok(([(CONTENT_TYPE, metrics.content_type())], body).into_response())
}
