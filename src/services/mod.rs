/// Pool loading and draft reset operations.
pub mod admin_service;
/// Board aggregation, read queries, and snapshot exports.
pub mod board_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Change-feed event construction and broadcasting.
pub mod feed_events;
/// Change-feed subscription and SSE forwarding.
pub mod feed_service;
/// Health check service.
pub mod health_service;
/// The atomic pick procedure and the per-seat submission flow.
pub mod pick_service;
/// Background task reconciling the board read model with the feed.
pub mod projection;
