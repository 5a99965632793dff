use std::time::SystemTime;

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

/// One fixed player slot on the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Seat number, `1..=roster.len()`, also the draft-order position.
    pub seat: u8,
    /// Display name shown on the board and in exports.
    pub name: String,
}

/// Ordered list of players defining seats and draft order.
///
/// Seats are numbered from 1 in list order; the draft cycles through them,
/// wrapping back to seat 1 after the last seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: Vec<PlayerSlot>,
}

impl Roster {
    /// Build a roster from display names, assigning seats in list order.
    pub fn new(names: Vec<String>) -> Self {
        let players = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| PlayerSlot {
                seat: (index + 1) as u8,
                name,
            })
            .collect();
        Self { players }
    }

    /// Number of seats on the roster.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster has no seats.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate the slots in seat order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerSlot> {
        self.players.iter()
    }

    /// Seat numbers in draft order.
    pub fn seats(&self) -> impl Iterator<Item = u8> + '_ {
        self.players.iter().map(|slot| slot.seat)
    }

    /// Whether `seat` names a valid roster slot.
    pub fn contains_seat(&self, seat: u8) -> bool {
        seat >= 1 && (seat as usize) <= self.players.len()
    }

    /// Display name for a seat, if the seat exists.
    pub fn player_name(&self, seat: u8) -> Option<&str> {
        if !self.contains_seat(seat) {
            return None;
        }
        Some(self.players[seat as usize - 1].name.as_str())
    }

    /// The seat drafting after `seat`, wrapping from the last seat back to 1.
    pub fn seat_after(&self, seat: u8) -> u8 {
        if (seat as usize) >= self.players.len() {
            1
        } else {
            seat + 1
        }
    }

    /// Turn-holder for the next pick given how many picks exist already.
    ///
    /// Derivable independently from [`DraftState`]; used for consistency
    /// checks, never as the authority on pick legality.
    pub fn turn_for_pick_count(&self, picks_so_far: u32) -> u8 {
        (picks_so_far as usize % self.players.len()) as u8 + 1
    }
}

/// A draftable celebrity in the shared pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Celebrity {
    /// Stable identifier assigned when the pool is loaded.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Age shown on the board and used for per-seat ordering.
    pub age: u32,
}

/// Durable record of one celebrity assigned to one seat.
///
/// Append-only: picks are never updated or deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// Position in the overall draft, starting at 1 and strictly increasing.
    pub pick_number: u32,
    /// Seat that made the pick.
    pub seat: u8,
    /// The drafted celebrity.
    pub celebrity_id: Uuid,
    /// When the pick was committed.
    pub picked_at: SystemTime,
}

/// Singleton turn tracker, advanced exactly once per successful pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftState {
    /// Seat currently authorized to submit the next pick.
    pub turn_seat: u8,
    /// Number of picks committed so far.
    pub pick_number: u32,
}

/// Denormalized pick row joining [`Pick`] with roster and celebrity data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
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
    /// When the pick was committed.
    pub picked_at: SystemTime,
}

/// Old and new [`DraftState`] values around a committed pick, used to build
/// the change-feed update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftStateChange {
    /// State before the pick.
    pub old: DraftState,
    /// State after the pick.
    pub new: DraftState,
}

/// Reason a pick submission was refused by the draft board.
///
/// These are logical rejections surfaced to the user, not transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickRejection {
    /// The submitting seat does not hold the turn.
    #[error("not your turn: seat {turn_seat} is on the clock")]
    NotYourTurn {
        /// Seat currently holding the turn.
        turn_seat: u8,
    },
    /// The submitted seat is not on the roster.
    #[error("seat {seat} is not on the roster")]
    UnknownSeat {
        /// The seat that was submitted.
        seat: u8,
    },
    /// The celebrity identifier does not exist in the pool.
    #[error("unknown celebrity")]
    UnknownCelebrity,
    /// The celebrity has already been drafted.
    #[error("{name} is already taken")]
    AlreadyDrafted {
        /// Name of the already-drafted celebrity.
        name: String,
    },
    /// No celebrities have been loaded into the pool.
    #[error("the celebrity pool is empty")]
    EmptyPool,
}

/// Error returned when replacing the celebrity pool after the draft started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot reload the celebrity pool once picks exist")]
pub struct PoolLocked;

/// In-memory authoritative draft storage: celebrity pool, pick log, and the
/// [`DraftState`] singleton.
///
/// All mutation goes through [`DraftBoard::commit_pick`] (the transactional
/// pick procedure), [`DraftBoard::replace_pool`], and [`DraftBoard::reset`];
/// callers serialize commits behind the shared pick gate.
#[derive(Debug)]
pub struct DraftBoard {
    roster: Roster,
    celebrities: IndexMap<Uuid, Celebrity>,
    picks: Vec<Pick>,
    draft_state: DraftState,
}

impl DraftBoard {
    /// Create an empty board for the given roster, seeded at seat 1, pick 0.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            celebrities: IndexMap::new(),
            picks: Vec::new(),
            draft_state: DraftState {
                turn_seat: 1,
                pick_number: 0,
            },
        }
    }

    /// The roster this board was created with.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current value of the [`DraftState`] singleton.
    pub fn draft_state(&self) -> DraftState {
        self.draft_state
    }

    /// All celebrities in load order.
    pub fn celebrities(&self) -> Vec<Celebrity> {
        self.celebrities.values().cloned().collect()
    }

    /// Look up a single celebrity by identifier.
    pub fn celebrity(&self, id: Uuid) -> Option<&Celebrity> {
        self.celebrities.get(&id)
    }

    /// Celebrities not yet drafted, in load order.
    pub fn available_pool(&self) -> Vec<Celebrity> {
        self.celebrities
            .values()
            .filter(|celebrity| !self.is_drafted(celebrity.id))
            .cloned()
            .collect()
    }

    /// Whether a pick exists for the given celebrity.
    pub fn is_drafted(&self, celebrity_id: Uuid) -> bool {
        self.picks
            .iter()
            .any(|pick| pick.celebrity_id == celebrity_id)
    }

    /// The append-only pick log in commit order.
    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    /// Denormalized rows for every pick, in commit order.
    pub fn board_rows(&self) -> Vec<BoardRow> {
        self.picks
            .iter()
            .filter_map(|pick| self.join_row(pick))
            .collect()
    }

    /// Denormalized row for one pick number, if it exists.
    pub fn board_row(&self, pick_number: u32) -> Option<BoardRow> {
        self.picks
            .iter()
            .find(|pick| pick.pick_number == pick_number)
            .and_then(|pick| self.join_row(pick))
    }

    /// Replace the celebrity pool, allowed only while no picks exist.
    ///
    /// Loading twice before the first pick is a full replacement.
    pub fn replace_pool(&mut self, celebrities: Vec<Celebrity>) -> Result<(), PoolLocked> {
        if !self.picks.is_empty() {
            return Err(PoolLocked);
        }

        self.celebrities = celebrities
            .into_iter()
            .map(|celebrity| (celebrity.id, celebrity))
            .collect();
        Ok(())
    }

    /// Transactional pick procedure: validate legality, append the pick, and
    /// advance the draft state, all in one step.
    ///
    /// The caller holds the pick gate, so no two commits interleave; the
    /// legality check and the mutation see the same state.
    pub fn commit_pick(
        &mut self,
        seat: u8,
        celebrity_id: Uuid,
    ) -> Result<(BoardRow, DraftStateChange), PickRejection> {
        if !self.roster.contains_seat(seat) {
            return Err(PickRejection::UnknownSeat { seat });
        }
        if self.celebrities.is_empty() {
            return Err(PickRejection::EmptyPool);
        }
        if seat != self.draft_state.turn_seat {
            return Err(PickRejection::NotYourTurn {
                turn_seat: self.draft_state.turn_seat,
            });
        }

        let Some(celebrity) = self.celebrities.get(&celebrity_id) else {
            return Err(PickRejection::UnknownCelebrity);
        };
        if self.is_drafted(celebrity_id) {
            return Err(PickRejection::AlreadyDrafted {
                name: celebrity.name.clone(),
            });
        }

        let old = self.draft_state;
        let pick = Pick {
            pick_number: old.pick_number + 1,
            seat,
            celebrity_id,
            picked_at: SystemTime::now(),
        };
        let new = DraftState {
            turn_seat: self.roster.seat_after(seat),
            pick_number: old.pick_number + 1,
        };

        self.picks.push(pick);
        self.draft_state = new;

        debug_assert_eq!(
            self.draft_state.turn_seat,
            self.roster.turn_for_pick_count(self.picks.len() as u32),
            "turn seat diverged from the pick count"
        );

        let row = self
            .board_row(new.pick_number)
            .expect("committed pick must join to a board row");
        Ok((row, DraftStateChange { old, new }))
    }

    /// Clear the pick log and restore the seeded draft state, keeping the
    /// celebrity pool.
    ///
    /// Returns the removed picks and the draft-state change so callers can
    /// emit the corrective feed events.
    pub fn reset(&mut self) -> (Vec<Pick>, DraftStateChange) {
        let removed = std::mem::take(&mut self.picks);
        let old = self.draft_state;
        let new = DraftState {
            turn_seat: 1,
            pick_number: 0,
        };
        self.draft_state = new;
        (removed, DraftStateChange { old, new })
    }

    /// Number of celebrities in the pool, drafted or not.
    pub fn pool_size(&self) -> usize {
        self.celebrities.len()
    }

    fn join_row(&self, pick: &Pick) -> Option<BoardRow> {
        let celebrity = self.celebrities.get(&pick.celebrity_id)?;
        let player_name = self.roster.player_name(pick.seat)?;
        Some(BoardRow {
            pick_number: pick.pick_number,
            seat: pick.seat,
            player_name: player_name.to_string(),
            celebrity_id: celebrity.id,
            celebrity_name: celebrity.name.clone(),
            celebrity_age: celebrity.age,
            picked_at: pick.picked_at,
        })
    }
}
