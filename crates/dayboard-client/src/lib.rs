//! HTTP client, client-side cache, and view helpers for Dayboard.
//!
//! [`ApiClient`] is the thin HTTP surface. [`CachedApi`] wraps it with a
//! per-entity query cache that deduplicates in-flight fetches and drops
//! responses superseded by an invalidation. [`views`] derives the calendar
//! and board shapes a frontend renders from the cached lists.

pub mod cache;
pub mod cached;
pub mod client;
pub mod error;
pub mod views;

pub use cache::{QueryCache, QueryState};
pub use cached::CachedApi;
pub use client::{ApiClient, EventCreate, EventUpdate, TaskCreate, TaskUpdate};
pub use error::ClientError;
