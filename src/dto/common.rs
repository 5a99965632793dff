use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::draft::{Celebrity, DraftState};

/// Snapshot of the draft-state singleton.
///
/// Also the complete payload of a `draft_state` change-feed update: consumers
/// replace their cached turn directly from it, no reload required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DraftStateDto {
    /// Seat currently authorized to submit the next pick.
    pub turn_seat: u8,
    /// Number of picks committed so far.
    pub pick_number: u32,
}

impl From<DraftState> for DraftStateDto {
    fn from(state: DraftState) -> Self {
        Self {
            turn_seat: state.turn_seat,
            pick_number: state.pick_number,
        }
    }
}

/// One celebrity as listed in the pool and on the change feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CelebrityDto {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Age shown on the board.
    pub age: u32,
}

impl From<Celebrity> for CelebrityDto {
    fn from(celebrity: Celebrity) -> Self {
        Self {
            id: celebrity.id,
            name: celebrity.name,
            age: celebrity.age,
        }
    }
}

/// Service metadata returned at the root path; also the target the
/// invalid-seat response points back to.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    /// Service name.
    pub service: String,
    /// Path of the read-only board view.
    pub board_path: String,
    /// Template of the per-seat pick view path.
    pub pick_path: String,
    /// Path of the interactive API documentation.
    pub docs_path: String,
}
