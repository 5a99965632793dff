use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process is serving.
    pub status: String,
    /// Whether the celebrity pool has been loaded.
    pub pool_loaded: bool,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(pool_loaded: bool) -> Self {
        Self {
            status: "ok".to_string(),
            pool_loaded,
        }
    }
}
