use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{common::DraftStateDto, format_system_time},
    state::draft::BoardRow,
};

/// One denormalized pick row as served to board consumers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardRowDto {
    /// Position in the overall draft.
    pub pick_number: u32,
    /// Seat that made the pick.
    pub seat: u8,
    /// Display name for the seat.
    pub player_name: String,
    /// Identifier of the drafted celebrity.
    pub celebrity_id: Uuid,
    /// Celebrity display name.
    pub celebrity_name: String,
    /// Celebrity age.
    pub celebrity_age: u32,
    /// RFC3339 commit timestamp.
    pub picked_at: String,
}

impl From<BoardRow> for BoardRowDto {
    fn from(row: BoardRow) -> Self {
        Self {
            pick_number: row.pick_number,
            seat: row.seat,
            player_name: row.player_name,
            celebrity_id: row.celebrity_id,
            celebrity_name: row.celebrity_name,
            celebrity_age: row.celebrity_age,
            picked_at: format_system_time(row.picked_at),
        }
    }
}

/// One seat's column on the aggregated board.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeatColumn {
    /// Seat number.
    pub seat: u8,
    /// Display name for the seat.
    pub player_name: String,
    /// Picks for this seat, ordered by descending age then ascending name.
    pub picks: Vec<BoardRowDto>,
}

/// The aggregated read-only board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardResponse {
    /// One column per roster seat, in roster order.
    pub seats: Vec<SeatColumn>,
    /// Pick number of the most recent pick, absent on an empty board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_pick_number: Option<u32>,
    /// Current draft state.
    pub draft_state: DraftStateDto,
    /// Feed subscription status of the read model: `connecting`, `live`, or
    /// `error`. Diagnostic only; staleness never blocks a pick.
    pub feed_status: String,
}
