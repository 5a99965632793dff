use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{common::RootResponse, health::HealthResponse},
    services::health_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
/// Return the current health status of the backend.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = health_service::health_status(&state).await;
    Json(status)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service metadata", body = RootResponse))
)]
/// Return service metadata and the paths of the main views.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "celeb-draft-back".to_string(),
        board_path: "/board".to_string(),
        pick_path: "/pick/{seat}".to_string(),
        docs_path: "/docs".to_string(),
    })
}

/// Configure the health and metadata routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/healthcheck", get(healthcheck))
        .route("/", get(root))
}
