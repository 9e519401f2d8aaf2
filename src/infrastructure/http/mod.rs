//! HTTP surface: the callback ingestion server.

pub mod callbacks;

pub use callbacks::{router, SharedReconciler};
