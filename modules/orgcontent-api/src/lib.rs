pub mod rest;

use std::sync::Arc;

use axum::{routing::get, Router};

use orgcontent_aggregator::ContentService;

pub struct AppState {
    pub service: Arc<dyn ContentService>,
}

/// Build the HTTP router. Tracing and other layers are added by the binary.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/organisations/{uuid}", get(rest::api_organisation))
        .route("/__gtg", get(rest::good_to_go))
        .with_state(state)
}
