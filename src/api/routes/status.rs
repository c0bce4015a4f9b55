//! On-demand status report

use axum::{Json, extract::State};
use tracing::debug;

use crate::api::{
    state::ApiState,
    types::{StatusEntry, StatusResponse},
};

/// GET /status
///
/// Checks every target right now and reports the outcomes in registry order.
/// These checks are recorded in the metrics store like scheduled ones. A down
/// target is part of the report, never an error response.
pub async fn get_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    if state.registry.is_empty() {
        return Json(StatusResponse::no_targets());
    }

    debug!("checking {} targets on demand", state.registry.len());

    let report = state
        .prober
        .check_all(state.registry.targets())
        .await
        .into_iter()
        .map(|(endpoint, outcome)| StatusEntry::new(endpoint, &outcome))
        .collect();

    Json(StatusResponse::Report(report))
}
