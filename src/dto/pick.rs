use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{
        board::BoardRowDto,
        common::{CelebrityDto, DraftStateDto},
    },
    view::submission::SubmitPhase,
};

/// Current submission flow status for one seat, mirroring
/// [`SubmitPhase`](crate::view::submission::SubmitPhase).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionStatus {
    /// `idle`, `pending_confirmation`, or `submitting`.
    pub phase: String,
    /// Celebrity staged for confirmation or in flight, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged_celebrity_id: Option<Uuid>,
}

impl From<&SubmitPhase> for SubmissionStatus {
    fn from(phase: &SubmitPhase) -> Self {
        match phase {
            SubmitPhase::Idle => Self {
                phase: "idle".to_string(),
                staged_celebrity_id: None,
            },
            SubmitPhase::PendingConfirmation { celebrity_id } => Self {
                phase: "pending_confirmation".to_string(),
                staged_celebrity_id: Some(*celebrity_id),
            },
            SubmitPhase::Submitting { celebrity_id } => Self {
                phase: "submitting".to_string(),
                staged_celebrity_id: Some(*celebrity_id),
            },
        }
    }
}

/// Everything a per-seat pick view needs: turn, pool, and session phase.
#[derive(Debug, Serialize, ToSchema)]
pub struct PickViewResponse {
    /// The seat this view belongs to.
    pub seat: u8,
    /// Display name for the seat.
    pub player_name: String,
    /// Current draft state (authoritative turn-holder).
    pub draft_state: DraftStateDto,
    /// Whether the advisory gate currently allows this seat to pick.
    pub my_turn: bool,
    /// Submission flow status for this seat.
    pub submission: SubmissionStatus,
    /// Remaining undrafted celebrities, in load order.
    pub pool: Vec<CelebrityDto>,
}

/// Request staging a celebrity for confirmation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    /// The celebrity to stage.
    pub celebrity_id: Uuid,
}

/// Structured result of the atomic pick procedure.
///
/// `ok: false` is a logical rejection for the user, delivered with HTTP 200;
/// it is never folded into a transport error.
#[derive(Debug, Serialize, ToSchema)]
pub struct PickOutcome {
    /// Whether the pick was committed.
    pub ok: bool,
    /// Human-readable rejection reason when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The committed pick row when `ok` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pick: Option<BoardRowDto>,
    /// Draft state after the procedure resolved.
    pub draft_state: DraftStateDto,
}

/// Body of the dedicated invalid-seat response, with a way back to the root.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidSeatResponse {
    /// What went wrong.
    pub message: String,
    /// Seats that do exist.
    pub valid_seats: Vec<u8>,
    /// Path to navigate back to.
    pub root: String,
}
