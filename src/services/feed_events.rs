use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        common::{CelebrityDto, DraftStateDto},
        feed::{ChangeEvent, FeedTable, PickRowDto},
    },
    state::{
        SharedState,
        draft::{BoardRow, Celebrity, DraftStateChange, Pick},
    },
};

/// Broadcast the pick row created by a successful pick.
pub fn broadcast_pick_inserted(state: &SharedState, row: &BoardRow) {
    let Some(value) = encode(&PickRowDto::from(row)) else {
        return;
    };
    state
        .feed_hub(FeedTable::Picks)
        .broadcast(ChangeEvent::insert(FeedTable::Picks, value));
}

/// Broadcast the removal of a pick row, the corrective path used by resets.
pub fn broadcast_pick_deleted(state: &SharedState, pick: &Pick) {
    let Some(value) = encode(&PickRowDto::from(pick)) else {
        return;
    };
    state
        .feed_hub(FeedTable::Picks)
        .broadcast(ChangeEvent::delete(FeedTable::Picks, value));
}

/// Broadcast a draft-state transition with both payload versions.
///
/// The new payload is complete: subscribers replace their cached turn from
/// it directly.
pub fn broadcast_draft_state_updated(state: &SharedState, change: DraftStateChange) {
    let old = encode(&DraftStateDto::from(change.old));
    let new = encode(&DraftStateDto::from(change.new));
    let (Some(old), Some(new)) = (old, new) else {
        return;
    };
    state
        .feed_hub(FeedTable::DraftState)
        .broadcast(ChangeEvent::update(FeedTable::DraftState, old, new));
}

/// Broadcast one celebrity arriving in the pool during a bulk load.
pub fn broadcast_celebrity_inserted(state: &SharedState, celebrity: &Celebrity) {
    let Some(value) = encode(&CelebrityDto::from(celebrity.clone())) else {
        return;
    };
    state
        .feed_hub(FeedTable::Celebrities)
        .broadcast(ChangeEvent::insert(FeedTable::Celebrities, value));
}

fn encode<T: Serialize>(payload: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(payload) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "failed to encode feed event payload");
            None
        }
    }
}
