//! Cache Module
//!
//! Provides the typed memory cache adapter, its value codec and statistics.

mod codec;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use codec::{DecodeError, EncodeError, FromCacheValue, Json, ToCacheValue};
pub use entry::{CacheEntry, EntryExpiry, MAX_EXPIRY};
pub use stats::{CacheStats, StatsRecorder};
pub use store::MemoryCache;
