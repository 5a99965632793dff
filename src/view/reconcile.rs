use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        common::DraftStateDto,
        feed::{ChangeEvent, ChangeKind, FeedTable, PickRowDto},
    },
    state::draft::{BoardRow, DraftState},
};

/// Connection status of a feed subscription.
///
/// Diagnostics only: a stale subscription never blocks the advisory turn
/// gate, since the pick procedure stays authoritative at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Subscription requested, handshake not yet seen.
    Connecting,
    /// Events are flowing.
    Live,
    /// The subscription dropped or lagged out.
    Error,
}

impl FeedStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedStatus::Connecting => "connecting",
            FeedStatus::Live => "live",
            FeedStatus::Error => "error",
        }
    }
}

/// Error raised by a row source backing a [`BoardCache`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not answer the query.
    #[error("row source unavailable: {message}")]
    Unavailable {
        /// What failed.
        message: String,
    },
}

/// Read access used by the cache to answer feed events: a targeted
/// single-row fetch plus the full reloads it falls back to.
pub trait RowSource: Send + Sync {
    /// Fetch the denormalized row for one pick number.
    fn fetch_row(&self, pick_number: u32)
    -> BoxFuture<'_, Result<Option<BoardRow>, SourceError>>;
    /// Load every denormalized row.
    fn load_rows(&self) -> BoxFuture<'_, Result<Vec<BoardRow>, SourceError>>;
    /// Load the draft-state singleton.
    fn load_draft_state(&self) -> BoxFuture<'_, Result<DraftState, SourceError>>;
}

/// How the cache absorbed one feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The inserted row was fetched and appended.
    Inserted,
    /// The event referenced a pick number already cached; nothing changed.
    DuplicateIgnored,
    /// Rows matching a deleted celebrity were removed.
    Removed(usize),
    /// The draft state was replaced from the event payload.
    Replaced,
    /// The event forced a full unconditional reload.
    Reloaded,
    /// The event does not concern this cache.
    Ignored,
}

/// Local board state kept consistent with the backend under interleaved full
/// reloads and incremental change-feed events.
///
/// Convergence model: events patch the cache incrementally; anything
/// surprising (duplicate delivery aside) degrades to a full reload, and a
/// later full reload always wins by overwriting prior partial state.
#[derive(Debug)]
pub struct BoardCache {
    rows: Vec<BoardRow>,
    draft_state: DraftState,
    status: FeedStatus,
}

impl Default for BoardCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardCache {
    /// Create an empty cache in the connecting state.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            draft_state: DraftState {
                turn_seat: 1,
                pick_number: 0,
            },
            status: FeedStatus::Connecting,
        }
    }

    /// Cached denormalized rows, in arrival order.
    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    /// Cached draft state.
    pub fn draft_state(&self) -> DraftState {
        self.draft_state
    }

    /// Current subscription status.
    pub fn status(&self) -> FeedStatus {
        self.status
    }

    /// Record a subscription status transition.
    pub fn set_status(&mut self, status: FeedStatus) {
        self.status = status;
    }

    /// Unconditionally replace the cache from the source.
    pub async fn reload<S>(&mut self, source: &S) -> Result<(), SourceError>
    where
        S: RowSource + ?Sized,
    {
        self.rows = source.load_rows().await?;
        self.draft_state = source.load_draft_state().await?;
        Ok(())
    }

    /// Absorb one change-feed event.
    ///
    /// Returns how the event was applied; an `Err` means even the fallback
    /// reload failed and the cache kept its previous contents.
    pub async fn apply<S>(
        &mut self,
        source: &S,
        event: &ChangeEvent,
    ) -> Result<Applied, SourceError>
    where
        S: RowSource + ?Sized,
    {
        match (event.table, event.kind) {
            (FeedTable::Picks, ChangeKind::Insert) => self.apply_pick_insert(source, event).await,
            (FeedTable::Picks, ChangeKind::Delete) => self.apply_pick_delete(source, event).await,
            (FeedTable::Picks, ChangeKind::Update) => {
                // Pick updates never happen in normal operation; reloading
                // wholesale is the corrective path, not a row patch.
                self.reload(source).await?;
                Ok(Applied::Reloaded)
            }
            (FeedTable::DraftState, ChangeKind::Update) => {
                self.apply_state_update(source, event).await
            }
            (FeedTable::DraftState, _) => {
                self.reload(source).await?;
                Ok(Applied::Reloaded)
            }
            (FeedTable::Celebrities, _) => Ok(Applied::Ignored),
        }
    }

    async fn apply_pick_insert<S>(
        &mut self,
        source: &S,
        event: &ChangeEvent,
    ) -> Result<Applied, SourceError>
    where
        S: RowSource + ?Sized,
    {
        let Some(row) = parse_row::<PickRowDto>(event.new_row.as_ref()) else {
            warn!("malformed pick insert payload; reloading the board");
            self.reload(source).await?;
            return Ok(Applied::Reloaded);
        };

        // The feed may double-deliver or race a direct reload.
        if self.contains_pick(row.pick_number) {
            return Ok(Applied::DuplicateIgnored);
        }

        match source.fetch_row(row.pick_number).await {
            Ok(Some(fetched)) => {
                // Re-check: the reload path may have landed the row while the
                // targeted fetch was in flight.
                if self.contains_pick(fetched.pick_number) {
                    return Ok(Applied::DuplicateIgnored);
                }
                self.rows.push(fetched);
                Ok(Applied::Inserted)
            }
            Ok(None) => {
                self.reload(source).await?;
                Ok(Applied::Reloaded)
            }
            Err(err) => {
                warn!(error = %err, pick_number = row.pick_number, "targeted row fetch failed; reloading the board");
                self.reload(source).await?;
                Ok(Applied::Reloaded)
            }
        }
    }

    async fn apply_pick_delete<S>(
        &mut self,
        source: &S,
        event: &ChangeEvent,
    ) -> Result<Applied, SourceError>
    where
        S: RowSource + ?Sized,
    {
        let Some(row) = parse_row::<PickRowDto>(event.old_row.as_ref()) else {
            warn!("malformed pick delete payload; reloading the board");
            self.reload(source).await?;
            return Ok(Applied::Reloaded);
        };

        let removed = self.remove_celebrity(row.celebrity_id);
        Ok(Applied::Removed(removed))
    }

    async fn apply_state_update<S>(
        &mut self,
        source: &S,
        event: &ChangeEvent,
    ) -> Result<Applied, SourceError>
    where
        S: RowSource + ?Sized,
    {
        let Some(state) = parse_row::<DraftStateDto>(event.new_row.as_ref()) else {
            warn!("malformed draft state payload; reloading the board");
            self.reload(source).await?;
            return Ok(Applied::Reloaded);
        };

        // The payload is already authoritative and complete; no reload.
        self.draft_state = DraftState {
            turn_seat: state.turn_seat,
            pick_number: state.pick_number,
        };
        Ok(Applied::Replaced)
    }

    fn contains_pick(&self, pick_number: u32) -> bool {
        self.rows.iter().any(|row| row.pick_number == pick_number)
    }

    fn remove_celebrity(&mut self, celebrity_id: Uuid) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.celebrity_id != celebrity_id);
        before - self.rows.len()
    }
}

fn parse_row<T: DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    value.and_then(|raw| serde_json::from_value(raw.clone()).ok())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::SystemTime,
    };

    use serde_json::json;

    use super::*;

    struct MockSource {
        rows: Mutex<Vec<BoardRow>>,
        draft_state: Mutex<DraftState>,
        fail_fetch: AtomicBool,
        full_loads: AtomicUsize,
    }

    impl MockSource {
        fn new(rows: Vec<BoardRow>, draft_state: DraftState) -> Self {
            Self {
                rows: Mutex::new(rows),
                draft_state: Mutex::new(draft_state),
                fail_fetch: AtomicBool::new(false),
                full_loads: AtomicUsize::new(0),
            }
        }

        fn full_loads(&self) -> usize {
            self.full_loads.load(Ordering::SeqCst)
        }
    }

    impl RowSource for MockSource {
        fn fetch_row(
            &self,
            pick_number: u32,
        ) -> BoxFuture<'_, Result<Option<BoardRow>, SourceError>> {
            Box::pin(async move {
                if self.fail_fetch.load(Ordering::SeqCst) {
                    return Err(SourceError::Unavailable {
                        message: "fetch failed".to_string(),
                    });
                }
                let rows = self.rows.lock().unwrap();
                Ok(rows
                    .iter()
                    .find(|row| row.pick_number == pick_number)
                    .cloned())
            })
        }

        fn load_rows(&self) -> BoxFuture<'_, Result<Vec<BoardRow>, SourceError>> {
            Box::pin(async move {
                self.full_loads.fetch_add(1, Ordering::SeqCst);
                Ok(self.rows.lock().unwrap().clone())
            })
        }

        fn load_draft_state(&self) -> BoxFuture<'_, Result<DraftState, SourceError>> {
            Box::pin(async move { Ok(*self.draft_state.lock().unwrap()) })
        }
    }

    fn row(pick_number: u32, seat: u8, celebrity_id: Uuid) -> BoardRow {
        BoardRow {
            pick_number,
            seat,
            player_name: format!("Player {seat}"),
            celebrity_id,
            celebrity_name: format!("Celebrity {pick_number}"),
            celebrity_age: 40 + pick_number,
            picked_at: SystemTime::UNIX_EPOCH,
        }
    }

    fn insert_event(pick_number: u32, seat: u8, celebrity_id: Uuid) -> ChangeEvent {
        ChangeEvent::insert(
            FeedTable::Picks,
            json!({
                "pick_number": pick_number,
                "seat": seat,
                "celebrity_id": celebrity_id,
                "picked_at": "1970-01-01T00:00:00Z",
            }),
        )
    }

    fn state(turn_seat: u8, pick_number: u32) -> DraftState {
        DraftState {
            turn_seat,
            pick_number,
        }
    }

    #[tokio::test]
    async fn insert_appends_the_fetched_row() {
        let id = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id)], state(2, 1));
        let mut cache = BoardCache::new();

        let applied = cache.apply(&source, &insert_event(1, 1, id)).await.unwrap();
        assert_eq!(applied, Applied::Inserted);
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].celebrity_id, id);
        assert_eq!(source.full_loads(), 0);
    }

    #[tokio::test]
    async fn duplicate_insert_does_not_create_a_second_row() {
        let id = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id)], state(2, 1));
        let mut cache = BoardCache::new();

        cache.apply(&source, &insert_event(1, 1, id)).await.unwrap();
        let applied = cache.apply(&source, &insert_event(1, 1, id)).await.unwrap();
        assert_eq!(applied, Applied::DuplicateIgnored);
        assert_eq!(cache.rows().len(), 1);
    }

    #[tokio::test]
    async fn failed_targeted_fetch_falls_back_to_full_reload() {
        let id = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id)], state(2, 1));
        source.fail_fetch.store(true, Ordering::SeqCst);
        let mut cache = BoardCache::new();

        let applied = cache.apply(&source, &insert_event(1, 1, id)).await.unwrap();
        assert_eq!(applied, Applied::Reloaded);
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(source.full_loads(), 1);
    }

    #[tokio::test]
    async fn missing_row_on_targeted_fetch_reloads() {
        let source = MockSource::new(Vec::new(), state(1, 0));
        let mut cache = BoardCache::new();

        let applied = cache
            .apply(&source, &insert_event(7, 1, Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(applied, Applied::Reloaded);
        assert_eq!(source.full_loads(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_matching_celebrity() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id), row(2, 2, other)], state(3, 2));
        let mut cache = BoardCache::new();
        cache.reload(&source).await.unwrap();

        let event = ChangeEvent::delete(
            FeedTable::Picks,
            json!({
                "pick_number": 1,
                "seat": 1,
                "celebrity_id": id,
                "picked_at": "1970-01-01T00:00:00Z",
            }),
        );
        let applied = cache.apply(&source, &event).await.unwrap();
        assert_eq!(applied, Applied::Removed(1));
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].celebrity_id, other);
    }

    #[tokio::test]
    async fn pick_update_always_reloads() {
        let id = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id)], state(2, 1));
        let mut cache = BoardCache::new();

        let event = ChangeEvent::update(
            FeedTable::Picks,
            json!({"pick_number": 1}),
            json!({"pick_number": 1}),
        );
        let applied = cache.apply(&source, &event).await.unwrap();
        assert_eq!(applied, Applied::Reloaded);
        assert_eq!(source.full_loads(), 1);
    }

    #[tokio::test]
    async fn draft_state_update_replaces_without_reload() {
        let source = MockSource::new(Vec::new(), state(1, 0));
        let mut cache = BoardCache::new();

        let event = ChangeEvent::update(
            FeedTable::DraftState,
            json!({"turn_seat": 1, "pick_number": 0}),
            json!({"turn_seat": 4, "pick_number": 9}),
        );
        let applied = cache.apply(&source, &event).await.unwrap();
        assert_eq!(applied, Applied::Replaced);
        assert_eq!(cache.draft_state(), state(4, 9));
        assert_eq!(source.full_loads(), 0);
    }

    #[tokio::test]
    async fn malformed_payload_degrades_to_reload() {
        let source = MockSource::new(Vec::new(), state(1, 0));
        let mut cache = BoardCache::new();

        let event = ChangeEvent::insert(FeedTable::Picks, json!({"unexpected": true}));
        let applied = cache.apply(&source, &event).await.unwrap();
        assert_eq!(applied, Applied::Reloaded);
        assert_eq!(source.full_loads(), 1);
    }

    #[tokio::test]
    async fn celebrity_events_do_not_touch_the_cache() {
        let source = MockSource::new(Vec::new(), state(1, 0));
        let mut cache = BoardCache::new();

        let event = ChangeEvent::insert(FeedTable::Celebrities, json!({"id": Uuid::new_v4()}));
        let applied = cache.apply(&source, &event).await.unwrap();
        assert_eq!(applied, Applied::Ignored);
        assert_eq!(source.full_loads(), 0);
    }

    #[tokio::test]
    async fn later_full_reload_overwrites_partial_state() {
        let id = Uuid::new_v4();
        let source = MockSource::new(vec![row(1, 1, id)], state(2, 1));
        let mut cache = BoardCache::new();
        cache.apply(&source, &insert_event(1, 1, id)).await.unwrap();

        // Backend state moved on; a full reload wins wholesale.
        let newer = Uuid::new_v4();
        *source.rows.lock().unwrap() = vec![row(1, 1, id), row(2, 2, newer)];
        *source.draft_state.lock().unwrap() = state(3, 2);

        cache.reload(&source).await.unwrap();
        assert_eq!(cache.rows().len(), 2);
        assert_eq!(cache.draft_state(), state(3, 2));
    }
}
