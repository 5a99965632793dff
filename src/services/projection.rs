use std::time::Duration;

use futures::future::BoxFuture;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    dto::feed::{ChangeEvent, FeedTable},
    state::{
        SharedState,
        draft::{BoardRow, DraftState},
    },
    view::reconcile::{FeedStatus, RowSource, SourceError},
};

/// How often the projection refreshes wholesale as a guard against a
/// silently stalled subscription.
const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Row source backed by the authoritative draft board.
struct StoreSource {
    state: SharedState,
}

impl RowSource for StoreSource {
    fn fetch_row(
        &self,
        pick_number: u32,
    ) -> BoxFuture<'_, Result<Option<BoardRow>, SourceError>> {
        Box::pin(async move { Ok(self.state.board().read().await.board_row(pick_number)) })
    }

    fn load_rows(&self) -> BoxFuture<'_, Result<Vec<BoardRow>, SourceError>> {
        Box::pin(async move { Ok(self.state.board().read().await.board_rows()) })
    }

    fn load_draft_state(&self) -> BoxFuture<'_, Result<DraftState, SourceError>> {
        Box::pin(async move { Ok(self.state.board().read().await.draft_state()) })
    }
}

/// Spawn the background task that keeps the board read model reconciled
/// with the change feed.
pub fn spawn(state: SharedState) -> JoinHandle<()> {
    tokio::spawn(run(state))
}

/// Force an immediate full reload of the read model.
///
/// Used after a successful pick so callers never depend solely on the feed,
/// which may lag or be suppressed.
pub async fn reload_now(state: &SharedState) -> Result<(), SourceError> {
    let source = StoreSource {
        state: state.clone(),
    };
    let mut cache = state.projection().write().await;
    cache.reload(&source).await
}

async fn run(state: SharedState) {
    let source = StoreSource {
        state: state.clone(),
    };
    let mut picks = state.feed_hub(FeedTable::Picks).subscribe();
    let mut draft_state = state.feed_hub(FeedTable::DraftState).subscribe();

    {
        let mut cache = state.projection().write().await;
        match cache.reload(&source).await {
            Ok(()) => cache.set_status(FeedStatus::Live),
            Err(err) => {
                warn!(error = %err, "initial board load failed");
                cache.set_status(FeedStatus::Error);
            }
        }
    }
    info!("board projection started");

    let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    refresh.tick().await; // the first tick completes immediately

    loop {
        tokio::select! {
            received = picks.recv() => {
                if !handle_event(&state, &source, received).await {
                    break;
                }
            }
            received = draft_state.recv() => {
                if !handle_event(&state, &source, received).await {
                    break;
                }
            }
            _ = refresh.tick() => {
                let mut cache = state.projection().write().await;
                if let Err(err) = cache.reload(&source).await {
                    warn!(error = %err, "periodic board refresh failed");
                    cache.set_status(FeedStatus::Error);
                } else {
                    cache.set_status(FeedStatus::Live);
                }
            }
        }
    }

    info!("board projection stopped");
}

/// Absorb one feed delivery; returns `false` once the feed is closed.
async fn handle_event(
    state: &SharedState,
    source: &StoreSource,
    received: Result<ChangeEvent, RecvError>,
) -> bool {
    match received {
        Ok(event) => {
            let mut cache = state.projection().write().await;
            match cache.apply(source, &event).await {
                Ok(applied) => {
                    debug!(table = %event.table, ?applied, "feed event applied");
                    cache.set_status(FeedStatus::Live);
                }
                Err(err) => {
                    warn!(error = %err, "failed to apply feed event");
                    cache.set_status(FeedStatus::Error);
                }
            }
            true
        }
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "projection lagged behind the feed; reloading");
            let mut cache = state.projection().write().await;
            if let Err(err) = cache.reload(source).await {
                warn!(error = %err, "reload after lag failed");
                cache.set_status(FeedStatus::Error);
            }
            true
        }
        Err(RecvError::Closed) => false,
    }
}
