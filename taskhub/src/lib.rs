//! `TaskHub` client library.
//!
//! Holds the authenticated caller's task cache, the derived dashboard
//! views recomputed from it, the task form controller, and the HTTP and
//! WebSocket plumbing that keeps the cache in sync with the server.

pub mod api;
pub mod cache;
pub mod form;
pub mod sync;
pub mod views;
