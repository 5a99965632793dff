use tokio::sync::broadcast;

use crate::dto::feed::{ChangeEvent, FeedTable};

/// Change-feed sub-state carved out from [`AppState`](super::AppState):
/// one broadcast hub per subscribable table.
pub struct FeedState {
    celebrities: FeedHub,
    picks: FeedHub,
    draft_state: FeedHub,
}

impl FeedState {
    /// Build the feed sub-tree with a shared per-table channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            celebrities: FeedHub::new(capacity),
            picks: FeedHub::new(capacity),
            draft_state: FeedHub::new(capacity),
        }
    }

    /// Hub carrying the change feed for `table`.
    pub fn hub(&self, table: FeedTable) -> &FeedHub {
        match table {
            FeedTable::Celebrities => &self.celebrities,
            FeedTable::Picks => &self.picks,
            FeedTable::DraftState => &self.draft_state,
        }
    }
}

/// Simple broadcast hub wrapper used by the change-feed services.
pub struct FeedHub {
    sender: broadcast::Sender<ChangeEvent>,
}

impl FeedHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}
