//! Memory Cache - A typed key-value adapter over an in-process cache
//!
//! Values are encoded to strings on write and decoded by the requested type
//! on read. Eviction and expiry are handled by the moka engine.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod library;
pub mod loader;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{FromCacheValue, Json, MemoryCache, ToCacheValue};
pub use config::{MemoryConfig, ServerConfig};
pub use error::{CacheError, Result};
pub use library::{Library, Lifecycle};
pub use loader::MemoryLoader;
pub use tasks::spawn_maintenance_task;
