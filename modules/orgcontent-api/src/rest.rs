use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use orgcontent_common::OrgContentError;
use tracing::warn;

use crate::AppState;

pub async fn api_organisation(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> impl IntoResponse {
    match state.service.organisation(&uuid).await {
        Ok(Some(org)) => Json(&*org).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e @ OrgContentError::GraphUnavailable { .. }) => {
            warn!(org_id = %uuid, error = %e, "Graph store unavailable");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Liveness probe.
pub async fn good_to_go() -> StatusCode {
    StatusCode::OK
}
