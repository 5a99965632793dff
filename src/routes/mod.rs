use axum::Router;

use crate::state::SharedState;

pub mod admin;
pub mod board;
pub mod docs;
pub mod feed;
pub mod health;
pub mod pick;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(board::router())
        .merge(pick::router())
        .merge(feed::router())
        .merge(admin::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
