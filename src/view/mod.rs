//! View-local logic shared by the HTTP surface and its consumers: the
//! reconciliation cache that tracks the live board, and the per-seat pick
//! submission flow.

pub mod reconcile;
pub mod submission;
