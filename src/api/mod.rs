//! API Module
//!
//! HTTP handlers and routing that expose one memory cache over REST.
//!
//! # Endpoints
//! - `PUT /set` - Store any JSON value under a key
//! - `GET /get/:key` - Retrieve the stored string form of a value
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
