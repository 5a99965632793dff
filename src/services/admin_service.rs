use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::admin::{LoadCelebritiesRequest, LoadCelebritiesResponse, ResetResponse},
    error::ServiceError,
    services::{feed_events, projection},
    state::{SharedState, draft::Celebrity},
};

/// Bulk-load the celebrity pool, replacing any pool loaded earlier.
///
/// Refused once the first pick exists; loading is an operator action that
/// happens before the draft opens.
pub async fn load_celebrities(
    state: &SharedState,
    request: LoadCelebritiesRequest,
) -> Result<LoadCelebritiesResponse, ServiceError> {
    let celebrities: Vec<Celebrity> = request
        .celebrities
        .into_iter()
        .map(|input| Celebrity {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            age: input.age,
        })
        .collect();
    let loaded = celebrities.len();

    {
        let mut board = state.board().write().await;
        board.replace_pool(celebrities.clone())?;
    }

    for celebrity in &celebrities {
        feed_events::broadcast_celebrity_inserted(state, celebrity);
    }

    info!(loaded, "celebrity pool loaded");
    Ok(LoadCelebritiesResponse { loaded })
}

/// Reset the draft: clear the pick log and restore the seeded draft state,
/// keeping the celebrity pool.
///
/// Emits a delete event per removed pick so live boards drop the rows
/// through their corrective path.
pub async fn reset_draft(state: &SharedState) -> ResetResponse {
    let gate = state.pick_gate().lock().await;

    let (removed, change, pool_size) = {
        let mut board = state.board().write().await;
        let (removed, change) = board.reset();
        (removed, change, board.pool_size())
    };

    for pick in &removed {
        feed_events::broadcast_pick_deleted(state, pick);
    }
    if change.old != change.new {
        feed_events::broadcast_draft_state_updated(state, change);
    }

    drop(gate);

    if let Err(err) = projection::reload_now(state).await {
        warn!(error = %err, "board reload after reset failed");
    }

    info!(removed = removed.len(), "draft reset");
    ResetResponse {
        draft_state: change.new.into(),
        pool_size,
    }
}
