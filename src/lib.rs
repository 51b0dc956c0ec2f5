//! TTL Bucket - an in-memory key-value store
//!
//! Holds permanent entries and entries with an absolute expiry in two
//! separately locked regions, expires lazily on read, and keeps usage counters.
//! The `api` module exposes the bucket over HTTP.

pub mod api;
pub mod bucket;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use bucket::{BucketStore, Entry, StatsSnapshot};
pub use config::Config;
pub use error::{ApiError, BucketError};
