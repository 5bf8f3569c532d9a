//! `TaskHub` API server library.
//!
//! An axum HTTP server exposing owner-scoped task CRUD behind bearer-token
//! authentication, plus a WebSocket endpoint that pushes task change
//! events to the owner's live clients. Exposed as a library so tests can
//! run the whole server in-process.

pub mod auth;
pub mod config;
pub mod events;
pub mod persist;
pub mod routes;
pub mod store;
