//! Dayboard HTTP service: an axum REST API over a SQLite entity store.
//!
//! Exposed as a library so integration tests can boot the real router.

pub mod routes;
pub mod state;
pub mod store;
