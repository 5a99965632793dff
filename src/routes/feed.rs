use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::{
    dto::feed::{FeedTable, UnknownTable},
    error::AppError,
    services::feed_service,
    state::SharedState,
};

#[derive(Debug, Deserialize, IntoParams)]
/// Optional row filter applied to a feed subscription.
pub struct FeedQuery {
    /// Deliver only events whose row references this seat.
    pub seat: Option<u8>,
}

#[utoipa::path(
    get,
    path = "/feed/{table}",
    tag = "feed",
    params(
        ("table" = String, Path, description = "One of `celebrities`, `picks`, `draft_state`"),
        FeedQuery
    ),
    responses(
        (status = 200, description = "Row-level change feed", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown table")
    )
)]
/// Stream row-level insert/update/delete events for one table.
pub async fn feed_stream(
    State(state): State<SharedState>,
    Path(table): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let table: FeedTable = table
        .parse()
        .map_err(|err: UnknownTable| AppError::NotFound(err.to_string()))?;

    let receiver = feed_service::subscribe(&state, table);
    info!(%table, seat = ?query.seat, "new feed subscription");
    Ok(feed_service::to_sse_stream(receiver, table, query.seat))
}

/// Configure the change-feed endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/feed/{table}", get(feed_stream))
}
