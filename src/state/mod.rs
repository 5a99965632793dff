pub mod draft;
pub mod feed;

use std::sync::Arc;

use dashmap::{DashMap, mapref::one::RefMut};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::feed::FeedTable,
    state::{
        draft::{Celebrity, DraftBoard, Roster},
        feed::{FeedHub, FeedState},
    },
    view::{reconcile::BoardCache, submission::SubmissionSession},
};

pub type SharedState = Arc<AppState>;

/// Per-table broadcast capacity for the change feed.
const FEED_CAPACITY: usize = 16;

/// Central application state: the authoritative draft board, the change-feed
/// hubs, the board projection, and the per-seat submission sessions.
pub struct AppState {
    config: AppConfig,
    board: RwLock<DraftBoard>,
    feed: FeedState,
    projection: RwLock<BoardCache>,
    sessions: DashMap<u8, SubmissionSession>,
    pick_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The celebrity pool is seeded from the configuration; the draft starts
    /// at seat 1, pick 0.
    pub fn new(config: AppConfig) -> SharedState {
        let mut board = DraftBoard::new(config.roster().clone());

        let seeds: Vec<Celebrity> = config
            .initial_celebrities()
            .iter()
            .map(|seed| Celebrity {
                id: Uuid::new_v4(),
                name: seed.name.clone(),
                age: seed.age,
            })
            .collect();
        if !seeds.is_empty() {
            board
                .replace_pool(seeds)
                .expect("a fresh board has no picks");
        }

        Arc::new(Self {
            config,
            board: RwLock::new(board),
            feed: FeedState::new(FEED_CAPACITY),
            projection: RwLock::new(BoardCache::new()),
            sessions: DashMap::new(),
            pick_gate: Mutex::new(()),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The roster defining seats and draft order.
    pub fn roster(&self) -> &Roster {
        self.config.roster()
    }

    /// The authoritative draft board.
    pub fn board(&self) -> &RwLock<DraftBoard> {
        &self.board
    }

    /// Broadcast hub carrying the change feed for `table`.
    pub fn feed_hub(&self, table: FeedTable) -> &FeedHub {
        self.feed.hub(table)
    }

    /// The reconciled board read model maintained by the projection task.
    pub fn projection(&self) -> &RwLock<BoardCache> {
        &self.projection
    }

    /// Mutable handle to one seat's submission session, created on first use.
    ///
    /// The returned guard is a DashMap lock; callers must drop it before
    /// awaiting.
    pub fn submission(&self, seat: u8) -> RefMut<'_, u8, SubmissionSession> {
        self.sessions
            .entry(seat)
            .or_insert_with(|| SubmissionSession::new(seat))
    }

    /// Gate serializing the atomic pick procedure.
    pub fn pick_gate(&self) -> &Mutex<()> {
        &self.pick_gate
    }
}
