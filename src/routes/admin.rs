use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;

use crate::{
    dto::admin::{LoadCelebritiesRequest, LoadCelebritiesResponse, ResetResponse},
    error::AppError,
    services::admin_service,
    state::SharedState,
};

/// Operator endpoints: pool loading and draft reset.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/celebrities", post(load_celebrities))
        .route("/admin/reset", post(reset_draft))
}

#[utoipa::path(
    post,
    path = "/admin/celebrities",
    tag = "admin",
    request_body = LoadCelebritiesRequest,
    responses(
        (status = 200, description = "Pool loaded", body = LoadCelebritiesResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Draft already started")
    )
)]
/// Bulk-load the celebrity pool before the draft opens.
pub async fn load_celebrities(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<LoadCelebritiesRequest>>,
) -> Result<Json<LoadCelebritiesResponse>, AppError> {
    let summary = admin_service::load_celebrities(&state, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    responses((status = 200, description = "Draft reset", body = ResetResponse))
)]
/// Clear all picks and restore the seeded draft state.
pub async fn reset_draft(State(state): State<SharedState>) -> Json<ResetResponse> {
    Json(admin_service::reset_draft(&state).await)
}
