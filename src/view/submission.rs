use thiserror::Error;
use uuid::Uuid;

/// Phases of one seat's pick submission flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    /// Nothing staged; the seat is browsing the pool.
    Idle,
    /// A celebrity is staged and awaiting explicit confirmation.
    PendingConfirmation {
        /// The staged celebrity.
        celebrity_id: Uuid,
    },
    /// The pick procedure has been invoked and has not yet resolved.
    Submitting {
        /// The celebrity the in-flight call targets.
        celebrity_id: Uuid,
    },
}

/// Steps that can be applied to a submission session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEvent {
    /// Stage a celebrity for confirmation.
    Select {
        /// The celebrity to stage.
        celebrity_id: Uuid,
    },
    /// Confirm the staged celebrity and invoke the pick procedure.
    Confirm,
    /// Discard the staged celebrity.
    Cancel,
    /// The pick procedure resolved, successfully or not.
    Resolve,
}

/// Error returned when a step cannot be applied from the current phase.
///
/// Also enforces single-flight: while [`SubmitPhase::Submitting`], every
/// select/confirm attempt lands here regardless of the targeted celebrity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid submission step: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidStep {
    /// The phase the session was in when the invalid step was received.
    pub from: SubmitPhase,
    /// The step that cannot be applied from this phase.
    pub event: SubmitEvent,
}

/// Reason a submission step was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The advisory turn gate rejected the step: the cached turn-holder is
    /// another seat. No procedure call is made for this rejection.
    #[error("not your turn: seat {turn_seat} is on the clock")]
    NotYourTurn {
        /// Cached turn-holder at the time of the step.
        turn_seat: u8,
    },
    /// The step does not apply to the current phase.
    #[error(transparent)]
    InvalidStep(#[from] InvalidStep),
}

/// Per-seat submission session: `Idle → PendingConfirmation → Submitting → Idle`.
///
/// The turn gate here is advisory only, a UX convenience fed by the cached
/// draft state. The authoritative legality check happens inside the pick
/// procedure; a rejection there surfaces through the procedure's outcome,
/// never through this machine.
#[derive(Debug, Clone)]
pub struct SubmissionSession {
    seat: u8,
    phase: SubmitPhase,
}

impl SubmissionSession {
    /// Create an idle session for a seat.
    pub fn new(seat: u8) -> Self {
        Self {
            seat,
            phase: SubmitPhase::Idle,
        }
    }

    /// The seat this session belongs to.
    pub fn seat(&self) -> u8 {
        self.seat
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// Stage a celebrity for confirmation.
    ///
    /// Permitted only while idle and only when the cached turn-holder is this
    /// seat; rejected locally otherwise, without any procedure call.
    pub fn select(&mut self, celebrity_id: Uuid, cached_turn_seat: u8) -> Result<(), SubmitError> {
        if self.phase != SubmitPhase::Idle {
            return Err(self.invalid(SubmitEvent::Select { celebrity_id }));
        }
        self.check_gate(cached_turn_seat)?;

        self.phase = SubmitPhase::PendingConfirmation { celebrity_id };
        Ok(())
    }

    /// Confirm the staged celebrity, moving the session in flight.
    ///
    /// Re-validates the turn gate: the cached turn may have gone stale while
    /// the confirmation was open. Returns the celebrity to submit.
    pub fn confirm(&mut self, cached_turn_seat: u8) -> Result<Uuid, SubmitError> {
        let SubmitPhase::PendingConfirmation { celebrity_id } = self.phase else {
            return Err(self.invalid(SubmitEvent::Confirm));
        };
        self.check_gate(cached_turn_seat)?;

        self.phase = SubmitPhase::Submitting { celebrity_id };
        Ok(celebrity_id)
    }

    /// Discard the staged celebrity and return to idle.
    pub fn cancel(&mut self) -> Result<(), SubmitError> {
        if !matches!(self.phase, SubmitPhase::PendingConfirmation { .. }) {
            return Err(self.invalid(SubmitEvent::Cancel));
        }
        self.phase = SubmitPhase::Idle;
        Ok(())
    }

    /// The in-flight procedure call resolved; clear the selection.
    ///
    /// Applies to success and failure alike: a rejected pick returns the
    /// session to idle with the rejection surfaced elsewhere, never retried.
    pub fn resolve(&mut self) -> Result<(), SubmitError> {
        if !matches!(self.phase, SubmitPhase::Submitting { .. }) {
            return Err(self.invalid(SubmitEvent::Resolve));
        }
        self.phase = SubmitPhase::Idle;
        Ok(())
    }

    fn check_gate(&self, cached_turn_seat: u8) -> Result<(), SubmitError> {
        if cached_turn_seat != self.seat {
            return Err(SubmitError::NotYourTurn {
                turn_seat: cached_turn_seat,
            });
        }
        Ok(())
    }

    fn invalid(&self, event: SubmitEvent) -> SubmitError {
        SubmitError::InvalidStep(InvalidStep {
            from: self.phase.clone(),
            event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_phase_is_idle() {
        let session = SubmissionSession::new(3);
        assert_eq!(*session.phase(), SubmitPhase::Idle);
        assert_eq!(session.seat(), 3);
    }

    #[test]
    fn full_happy_path_through_submission() {
        let mut session = SubmissionSession::new(1);
        let target = Uuid::new_v4();

        session.select(target, 1).unwrap();
        assert_eq!(
            *session.phase(),
            SubmitPhase::PendingConfirmation {
                celebrity_id: target
            }
        );

        let confirmed = session.confirm(1).unwrap();
        assert_eq!(confirmed, target);
        assert_eq!(
            *session.phase(),
            SubmitPhase::Submitting {
                celebrity_id: target
            }
        );

        session.resolve().unwrap();
        assert_eq!(*session.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn select_rejected_when_turn_is_elsewhere() {
        let mut session = SubmissionSession::new(2);
        let err = session.select(Uuid::new_v4(), 1).unwrap_err();
        assert_eq!(err, SubmitError::NotYourTurn { turn_seat: 1 });
        assert_eq!(*session.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn confirm_revalidates_stale_turn() {
        let mut session = SubmissionSession::new(1);
        session.select(Uuid::new_v4(), 1).unwrap();

        // Turn moved to seat 2 while the confirmation sheet was open.
        let err = session.confirm(2).unwrap_err();
        assert_eq!(err, SubmitError::NotYourTurn { turn_seat: 2 });
        assert!(matches!(
            session.phase(),
            SubmitPhase::PendingConfirmation { .. }
        ));
    }

    #[test]
    fn submission_is_single_flight() {
        let mut session = SubmissionSession::new(1);
        let first = Uuid::new_v4();
        session.select(first, 1).unwrap();
        session.confirm(1).unwrap();

        let other = Uuid::new_v4();
        let err = session.select(other, 1).unwrap_err();
        match err {
            SubmitError::InvalidStep(InvalidStep { from, event }) => {
                assert_eq!(
                    from,
                    SubmitPhase::Submitting {
                        celebrity_id: first
                    }
                );
                assert_eq!(
                    event,
                    SubmitEvent::Select {
                        celebrity_id: other
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(session.confirm(1).is_err());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut session = SubmissionSession::new(1);
        session.select(Uuid::new_v4(), 1).unwrap();
        session.cancel().unwrap();
        assert_eq!(*session.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn resolve_without_inflight_call_is_invalid() {
        let mut session = SubmissionSession::new(1);
        let err = session.resolve().unwrap_err();
        assert!(matches!(err, SubmitError::InvalidStep(_)));
    }

    #[test]
    fn resolve_applies_after_failed_submission_too() {
        let mut session = SubmissionSession::new(1);
        session.select(Uuid::new_v4(), 1).unwrap();
        session.confirm(1).unwrap();

        // The procedure reported a logical rejection; the selection is still
        // cleared and nothing is auto-retried.
        session.resolve().unwrap();
        assert_eq!(*session.phase(), SubmitPhase::Idle);
    }
}
