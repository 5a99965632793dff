use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health payload.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let pool_loaded = state.board().read().await.pool_size() > 0;
    HealthResponse::ok(pool_loaded)
}
