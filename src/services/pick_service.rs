use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        common::CelebrityDto,
        pick::{PickOutcome, PickViewResponse, SubmissionStatus},
    },
    error::ServiceError,
    services::{feed_events, projection},
    state::SharedState,
};

/// The atomic pick procedure: validate, append, and advance in one step.
///
/// Serialized by the shared pick gate so concurrent submissions cannot
/// interleave; the loser of a race for the same celebrity receives a plain
/// `ok: false` outcome, never a transport error. Feed events are broadcast
/// while the gate is still held so subscribers observe commits in order.
pub async fn submit(state: &SharedState, seat: u8, celebrity_id: Uuid) -> PickOutcome {
    let gate = state.pick_gate().lock().await;

    let result = {
        let mut board = state.board().write().await;
        board.commit_pick(seat, celebrity_id)
    };

    let outcome = match result {
        Ok((row, change)) => {
            feed_events::broadcast_pick_inserted(state, &row);
            feed_events::broadcast_draft_state_updated(state, change);
            info!(
                seat,
                pick_number = row.pick_number,
                celebrity = %row.celebrity_name,
                "pick committed"
            );
            PickOutcome {
                ok: true,
                message: None,
                pick: Some(row.into()),
                draft_state: change.new.into(),
            }
        }
        Err(rejection) => {
            let current = state.board().read().await.draft_state();
            info!(seat, reason = %rejection, "pick rejected");
            PickOutcome {
                ok: false,
                message: Some(rejection.to_string()),
                pick: None,
                draft_state: current.into(),
            }
        }
    };

    drop(gate);
    outcome
}

/// Assemble the per-seat pick view: cached turn, pool, and session phase.
///
/// The turn shown here comes from the reconciled read model, so it is the
/// advisory value the submission gate also sees; the procedure re-checks
/// against the authoritative board at commit time.
pub async fn view(state: &SharedState, seat: u8) -> PickViewResponse {
    let cached = state.projection().read().await.draft_state();
    let pool: Vec<CelebrityDto> = state
        .board()
        .read()
        .await
        .available_pool()
        .into_iter()
        .map(Into::into)
        .collect();

    let submission = SubmissionStatus::from(state.submission(seat).phase());
    let player_name = state
        .roster()
        .player_name(seat)
        .map(str::to_string)
        .unwrap_or_default();

    PickViewResponse {
        seat,
        player_name,
        draft_state: cached.into(),
        my_turn: cached.turn_seat == seat,
        submission,
        pool,
    }
}

/// Stage a celebrity for confirmation.
///
/// Rejected locally, with no procedure call, when the cached turn-holder is
/// another seat or a submission is already in flight.
pub async fn select(
    state: &SharedState,
    seat: u8,
    celebrity_id: Uuid,
) -> Result<SubmissionStatus, ServiceError> {
    let cached_turn = state.projection().read().await.draft_state().turn_seat;

    let mut session = state.submission(seat);
    session.select(celebrity_id, cached_turn)?;
    Ok(SubmissionStatus::from(session.phase()))
}

/// Confirm the staged celebrity and run the pick procedure.
///
/// The turn gate is re-validated first since the cached turn may have gone
/// stale while the confirmation was open. On success the read model is
/// reloaded unconditionally rather than waiting on the feed; on failure the
/// outcome carries the rejection and nothing is retried.
pub async fn confirm(state: &SharedState, seat: u8) -> Result<PickOutcome, ServiceError> {
    let cached_turn = state.projection().read().await.draft_state().turn_seat;

    let celebrity_id = {
        let mut session = state.submission(seat);
        session.confirm(cached_turn)?
    };

    let outcome = submit(state, seat, celebrity_id).await;

    {
        let mut session = state.submission(seat);
        if let Err(err) = session.resolve() {
            warn!(seat, error = %err, "submission session out of phase at resolve");
        }
    }

    if outcome.ok
        && let Err(err) = projection::reload_now(state).await
    {
        warn!(error = %err, "board reload after pick failed");
    }

    Ok(outcome)
}

/// Discard the staged celebrity and return the session to idle.
pub async fn cancel(state: &SharedState, seat: u8) -> Result<SubmissionStatus, ServiceError> {
    let mut session = state.submission(seat);
    session.cancel()?;
    Ok(SubmissionStatus::from(session.phase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{
            AppState,
            draft::{Celebrity, Roster},
        },
    };

    async fn test_state(seats: usize, pool: &[(&str, u32)]) -> SharedState {
        let roster = Roster::new((1..=seats).map(|i| format!("Player {i}")).collect());
        let state = AppState::new(AppConfig::with_roster(roster));

        let celebrities: Vec<Celebrity> = pool
            .iter()
            .map(|(name, age)| Celebrity {
                id: Uuid::new_v4(),
                name: (*name).to_string(),
                age: *age,
            })
            .collect();
        state
            .board()
            .write()
            .await
            .replace_pool(celebrities)
            .unwrap();
        state
    }

    async fn pool_ids(state: &SharedState) -> Vec<Uuid> {
        state
            .board()
            .read()
            .await
            .available_pool()
            .iter()
            .map(|celebrity| celebrity.id)
            .collect()
    }

    #[tokio::test]
    async fn first_pick_advances_turn_and_lands_on_the_board() {
        let state = test_state(6, &[("Ada Lovelace", 36), ("Grace Hopper", 85)]).await;
        let target = pool_ids(&state).await[0];

        select(&state, 1, target).await.unwrap();
        let outcome = confirm(&state, 1).await.unwrap();

        assert!(outcome.ok);
        assert_eq!(outcome.draft_state.turn_seat, 2);
        assert_eq!(outcome.draft_state.pick_number, 1);

        let rows = state.board().read().await.board_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].seat, 1);

        // The forced reload keeps the read model in step without the feed.
        assert_eq!(state.projection().read().await.draft_state().turn_seat, 2);
    }

    #[tokio::test]
    async fn out_of_turn_select_is_rejected_without_a_procedure_call() {
        let state = test_state(6, &[("Ada Lovelace", 36)]).await;
        let target = pool_ids(&state).await[0];

        let err = select(&state, 2, target).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
        assert!(state.board().read().await.picks().is_empty());
    }

    #[tokio::test]
    async fn forced_out_of_turn_submission_gets_a_rejection_outcome() {
        let state = test_state(6, &[("Ada Lovelace", 36)]).await;
        let target = pool_ids(&state).await[0];

        // Bypass the advisory gate and hit the procedure directly.
        let outcome = submit(&state, 2, target).await;
        assert!(!outcome.ok);
        assert!(outcome.message.unwrap().contains("not your turn"));
        assert!(state.board().read().await.picks().is_empty());
    }

    #[tokio::test]
    async fn racing_submissions_for_one_celebrity_yield_a_single_winner() {
        let state = test_state(2, &[("Ada Lovelace", 36), ("Grace Hopper", 85)]).await;
        let contested = pool_ids(&state).await[0];

        let (first, second) = tokio::join!(
            submit(&state, 1, contested),
            submit(&state, 2, contested)
        );

        let successes = [&first, &second].iter().filter(|o| o.ok).count();
        assert_eq!(successes, 1);

        let loser = if first.ok { &second } else { &first };
        assert!(loser.message.is_some());

        let board = state.board().read().await;
        assert_eq!(board.picks().len(), 1);
        assert_eq!(board.picks()[0].celebrity_id, contested);
    }

    #[tokio::test]
    async fn rejected_confirm_returns_the_session_to_idle() {
        let state = test_state(2, &[("Ada Lovelace", 36)]).await;
        let target = pool_ids(&state).await[0];

        select(&state, 1, target).await.unwrap();

        // The same seat commits the pick through another tab; the cached
        // turn behind this session's gate is now stale.
        let direct = submit(&state, 1, target).await;
        assert!(direct.ok);

        let outcome = confirm(&state, 1).await.unwrap();
        assert!(!outcome.ok);
        assert!(
            matches!(
                state.submission(1).phase(),
                &crate::view::submission::SubmitPhase::Idle
            ),
            "a rejected pick must clear the pending selection"
        );
    }
}
