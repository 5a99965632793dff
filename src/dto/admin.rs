use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{common::DraftStateDto, validation::validate_display_name};

/// Payload bulk-loading the celebrity pool before the draft opens.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoadCelebritiesRequest {
    /// Celebrities to load; replaces any pool loaded earlier.
    #[validate(
        length(min = 1, message = "at least one celebrity is required"),
        nested
    )]
    pub celebrities: Vec<CelebrityInput>,
}

/// Incoming celebrity definition for the bulk load.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CelebrityInput {
    /// Display name.
    #[validate(custom(function = validate_display_name))]
    pub name: String,
    /// Age shown on the board.
    #[validate(range(min = 1, max = 130, message = "age must be between 1 and 130"))]
    pub age: u32,
}

/// Summary returned once the pool has been loaded.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoadCelebritiesResponse {
    /// Number of celebrities now in the pool.
    pub loaded: usize,
}

/// Summary returned once the draft has been reset.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetResponse {
    /// The reseeded draft state.
    pub draft_state: DraftStateDto,
    /// Number of celebrities kept in the pool.
    pub pool_size: usize,
}
