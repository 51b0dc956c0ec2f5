//! API Module
//!
//! HTTP handlers and routing for the bucket server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair, optionally with an expiry
//! - `GET /get/:key` - Retrieve an entry by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get bucket statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
