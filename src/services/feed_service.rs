use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::feed::{ChangeEvent, FeedHandshake, FeedTable},
    state::SharedState,
};

/// Subscribe to the change feed for one table.
pub fn subscribe(state: &SharedState, table: FeedTable) -> broadcast::Receiver<ChangeEvent> {
    state.feed_hub(table).subscribe()
}

/// Convert a broadcast receiver into an SSE response, forwarding matching
/// events and cleaning up once the client disconnects.
///
/// With a `seat` filter only events whose row references that seat are
/// delivered; rows without a seat field never match a filter.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ChangeEvent>,
    table: FeedTable,
    seat_filter: Option<u8>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        let _ = tx.send(Ok(handshake_event(table))).await;

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(event) => {
                            if let Some(seat) = seat_filter
                                && event.seat() != Some(seat)
                            {
                                continue;
                            }

                            let Ok(data) = serde_json::to_string(&event) else {
                                tracing::warn!(table = %table, "failed to encode feed event; skipping");
                                continue;
                            };

                            let event = Event::default().event("change").data(data);
                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged messages but keep the stream alive;
                            // subscribers recover via their reload fallback.
                            continue;
                        }
                    }
                }
            }
        }

        tracing::info!(table = %table, "feed stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Initial event confirming the subscription to the client.
fn handshake_event(table: FeedTable) -> Event {
    let handshake = FeedHandshake {
        table,
        message: format!("subscribed to {table}"),
    };
    let data = serde_json::to_string(&handshake)
        .unwrap_or_else(|_| format!("{{\"table\":\"{table}\"}}"));
    Event::default().event("handshake").data(data)
}
