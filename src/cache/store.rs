//! Memory Cache Module
//!
//! Typed key-value adapter over a moka concurrent cache. Values are encoded to
//! strings on write and decoded by the caller's requested type on read.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::notification::RemovalCause;
use moka::sync::Cache;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheEntry, CacheStats, EntryExpiry, FromCacheValue, StatsRecorder, ToCacheValue, MAX_EXPIRY,
};
use crate::config::MemoryConfig;
use crate::error::{CacheError, Result};
use crate::library::Lifecycle;

// == Memory Cache ==
/// Shared handle to an in-process cache. Cloning is cheap and every clone
/// sees the same entries.
#[derive(Clone)]
pub struct MemoryCache {
    /// Underlying concurrent cache engine
    cache: Cache<String, CacheEntry>,
    /// Hit/miss/eviction counters
    stats: Arc<StatsRecorder>,
    /// Largest encoded value accepted by `set`
    max_value_size: usize,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a new MemoryCache from configuration.
    ///
    /// A zero `limit` uses the default capacity and a zero `expires_in`
    /// disables idle expiry.
    ///
    /// # Errors
    /// Returns `CacheError::Config` if `expires_in` is longer than the engine
    /// supports or `max_value_size` is zero.
    pub fn new(config: &MemoryConfig) -> Result<Self> {
        if config.expires_in > MAX_EXPIRY {
            return Err(CacheError::Config(format!(
                "expires_in of {}s exceeds the 1000 year maximum",
                config.expires_in.as_secs()
            )));
        }
        if config.max_value_size == 0 {
            return Err(CacheError::Config(
                "max_value_size must be greater than zero".to_string(),
            ));
        }

        let limit = config.effective_limit();
        let stats = Arc::new(StatsRecorder::new());
        let listener_stats = Arc::clone(&stats);

        let cache = Cache::builder()
            .max_capacity(limit)
            .expire_after(EntryExpiry::new(config.expires_in))
            .eviction_listener(move |key: Arc<String>, _value: CacheEntry, cause| {
                if cause.was_evicted() {
                    listener_stats.record_eviction();
                    debug!(key = %key, cause = ?cause, "Entry evicted");
                } else if cause == RemovalCause::Explicit {
                    debug!(key = %key, "Entry removed");
                }
            })
            .build();

        info!(
            limit,
            expires_in_ms = config.expires_in.as_millis() as u64,
            max_value_size = config.max_value_size,
            "Memory cache initialized"
        );

        Ok(Self {
            cache,
            stats,
            max_value_size: config.max_value_size,
        })
    }

    // == Set ==
    /// Encodes and stores a value.
    ///
    /// A `Some` TTL pins the entry to expire that long after this write;
    /// `None` (or zero) leaves it on the configured idle expiry.
    ///
    /// # Errors
    /// - `CacheError::NilValue` if the value is `None`
    /// - `CacheError::Encode` if JSON serialization fails
    /// - `CacheError::Rejected` if the encoded value exceeds `max_value_size`
    /// - `CacheError::InvalidArgument` if the TTL is longer than 1000 years
    ///
    /// On error the existing entry for `key` is left untouched.
    pub fn set<V: ToCacheValue>(&self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        let encoded = value
            .to_cache_value()
            .map_err(|e| e.into_cache_error(key))?;

        if encoded.len() > self.max_value_size {
            return Err(CacheError::Rejected {
                key: key.to_string(),
                reason: format!(
                    "encoded value is {} bytes, maximum is {}",
                    encoded.len(),
                    self.max_value_size
                ),
            });
        }

        if let Some(ttl) = ttl.filter(|ttl| *ttl > MAX_EXPIRY) {
            return Err(CacheError::InvalidArgument(format!(
                "ttl of {}s for key {} exceeds the 1000 year maximum",
                ttl.as_secs(),
                key
            )));
        }

        debug!(key, bytes = encoded.len(), ttl = ?ttl, "Storing value");
        self.cache
            .insert(key.to_string(), CacheEntry::new(encoded, ttl));
        Ok(())
    }

    // == Get ==
    /// Reads and decodes a value as `T`.
    ///
    /// Returns `Ok(None)` if the key is absent or expired.
    ///
    /// # Errors
    /// Returns `CacheError::Decode` if the stored string does not parse as `T`.
    pub fn get<T: FromCacheValue>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.lookup(key) else {
            return Ok(None);
        };

        T::from_cache_value(&raw)
            .map(Some)
            .map_err(|e| CacheError::Decode {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    // == Get Into ==
    /// Reads a value into `out`, returning whether the key was present.
    ///
    /// Decoding is best effort: if the stored string does not parse as `T`,
    /// `out` keeps its prior value and the call still returns `true`.
    /// Use [`MemoryCache::get`] to observe decode failures.
    pub fn get_into<T: FromCacheValue>(&self, key: &str, out: &mut T) -> bool {
        let Some(raw) = self.lookup(key) else {
            return false;
        };

        match T::from_cache_value(&raw) {
            Ok(value) => *out = value,
            Err(e) => warn!(key, error = %e, "Ignoring undecodable cached value"),
        }
        true
    }

    // == Get Raw ==
    /// Returns the stored string without decoding.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lookup(key)
    }

    // == Delete ==
    /// Removes an entry, returning whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    // == Contains ==
    /// Checks for a live entry without touching its expiry or the stats.
    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    // == Clear ==
    /// Invalidates every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    // == Entry Count ==
    /// Returns the approximate number of entries.
    ///
    /// The count lags behind writes until maintenance runs.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    // == Maintenance ==
    /// Applies pending evictions and purges expired entries.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.cache.entry_count())
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.cache.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }
}

impl Lifecycle for MemoryCache {}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entry_count", &self.cache.entry_count())
            .field("max_value_size", &self.max_value_size)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Json;
    use serde::{Deserialize, Serialize};
    use std::thread::sleep;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Session {
        user_id: u64,
        roles: Vec<String>,
    }

    fn new_cache() -> MemoryCache {
        MemoryCache::new(&MemoryConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_oversized_expiry() {
        let config = MemoryConfig {
            expires_in: MAX_EXPIRY + Duration::from_secs(1),
            ..MemoryConfig::default()
        };
        assert!(matches!(
            MemoryCache::new(&config),
            Err(CacheError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_zero_value_size() {
        let config = MemoryConfig {
            max_value_size: 0,
            ..MemoryConfig::default()
        };
        assert!(matches!(
            MemoryCache::new(&config),
            Err(CacheError::Config(_))
        ));
    }

    #[test]
    fn test_set_and_get_int() {
        let cache = new_cache();

        cache.set("n", 42, None).unwrap();
        let mut i: i32 = 0;
        assert!(cache.get_into("n", &mut i));
        assert_eq!(i, 42);
    }

    #[test]
    fn test_bool_stored_as_one() {
        let cache = new_cache();

        cache.set("b", true, None).unwrap();
        assert_eq!(cache.get_raw("b").as_deref(), Some("1"));
        assert_eq!(cache.get::<bool>("b").unwrap(), Some(true));

        cache.set("b", false, None).unwrap();
        assert_eq!(cache.get_raw("b").as_deref(), Some("0"));
    }

    #[test]
    fn test_set_and_get_float() {
        let cache = new_cache();

        cache.set("f", 3.14, None).unwrap();
        let mut f = 0.0f64;
        assert!(cache.get_into("f", &mut f));
        assert_eq!(f, 3.14);
    }

    #[test]
    fn test_set_str_and_string() {
        let cache = new_cache();

        cache.set("a", "hello", None).unwrap();
        cache.set("b", String::from("world"), None).unwrap();
        assert_eq!(cache.get::<String>("a").unwrap().as_deref(), Some("hello"));
        assert_eq!(cache.get::<String>("b").unwrap().as_deref(), Some("world"));
    }

    #[test]
    fn test_get_missing_leaves_output() {
        let cache = new_cache();

        let mut x = 7u8;
        assert!(!cache.get_into("missing", &mut x));
        assert_eq!(x, 7);
        assert_eq!(cache.get::<u8>("missing").unwrap(), None);
        assert_eq!(cache.get_raw("missing"), None);
    }

    #[test]
    fn test_set_none_keeps_existing_entry() {
        let cache = new_cache();

        cache.set("k", 1u32, None).unwrap();
        let result = cache.set("k", None::<u32>, None);
        assert!(matches!(result, Err(CacheError::NilValue { ref key }) if key == "k"));
        assert_eq!(cache.get::<u32>("k").unwrap(), Some(1));

        assert!(cache.set("fresh", None::<String>, None).is_err());
        assert!(!cache.contains("fresh"));
    }

    #[test]
    fn test_json_struct_round_trip() {
        let cache = new_cache();
        let session = Session {
            user_id: 9,
            roles: vec!["admin".to_string(), "ops".to_string()],
        };

        cache.set("session", Json(&session), None).unwrap();

        let mut out = Json(Session {
            user_id: 0,
            roles: Vec::new(),
        });
        assert!(cache.get_into("session", &mut out));
        assert_eq!(out.0, session);
    }

    #[test]
    fn test_encode_failure_names_key() {
        let cache = new_cache();
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);

        let err = cache.set("bad", Json(map), None).unwrap_err();
        assert!(matches!(err, CacheError::Encode { ref key, .. } if key == "bad"));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_oversized_value_rejected() {
        let config = MemoryConfig {
            max_value_size: 8,
            ..MemoryConfig::default()
        };
        let cache = MemoryCache::new(&config).unwrap();

        assert!(cache.set("small", "12345678", None).is_ok());
        let err = cache.set("big", "123456789", None).unwrap_err();
        assert!(matches!(err, CacheError::Rejected { ref key, .. } if key == "big"));
        assert!(!cache.contains("big"));
    }

    #[test]
    fn test_decode_failure_surfaced_by_get() {
        let cache = new_cache();

        cache.set("word", "not a number", None).unwrap();
        assert!(matches!(
            cache.get::<i64>("word"),
            Err(CacheError::Decode { ref key, .. }) if key == "word"
        ));
    }

    #[test]
    fn test_decode_failure_silent_in_get_into() {
        let cache = new_cache();

        cache.set("word", "not a number", None).unwrap();
        let mut n = 5i64;
        assert!(cache.get_into("word", &mut n));
        assert_eq!(n, 5);
    }

    #[test]
    fn test_decode_by_requested_type() {
        let cache = new_cache();

        cache.set("n", 255u8, None).unwrap();
        assert_eq!(cache.get::<String>("n").unwrap().as_deref(), Some("255"));
        assert_eq!(cache.get::<f64>("n").unwrap(), Some(255.0));
        assert!(cache.get::<i8>("n").is_err());
    }

    #[test]
    fn test_overwrite() {
        let cache = new_cache();

        cache.set("k", "v1", None).unwrap();
        cache.set("k", "v2", None).unwrap();
        assert_eq!(cache.get_raw("k").as_deref(), Some("v2"));
    }

    #[test]
    fn test_delete() {
        let cache = new_cache();

        cache.set("k", 1, None).unwrap();
        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert_eq!(cache.get_raw("k"), None);
    }

    #[test]
    fn test_clear() {
        let cache = new_cache();

        cache.set("a", 1, None).unwrap();
        cache.set("b", 2, None).unwrap();
        cache.clear();
        cache.run_pending_tasks();

        assert!(!cache.contains("a"));
        assert!(!cache.contains("b"));
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_stats() {
        let cache = new_cache();

        cache.set("k", "v", None).unwrap();
        cache.get_raw("k"); // hit
        cache.get_raw("nope"); // miss
        let mut out = String::new();
        cache.get_into("k", &mut out); // hit
        cache.run_pending_tasks();

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_contains_does_not_count() {
        let cache = new_cache();

        cache.set("k", "v", None).unwrap();
        assert!(cache.contains("k"));
        assert!(!cache.contains("other"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_capacity_enforced_by_engine() {
        let config = MemoryConfig {
            limit: 10,
            ..MemoryConfig::default()
        };
        let cache = MemoryCache::new(&config).unwrap();

        for i in 0..100 {
            cache.set(&format!("key{}", i), i, None).unwrap();
        }
        cache.run_pending_tasks();

        assert!(cache.entry_count() <= 10);
        assert!(cache.stats().evictions > 0);
    }

    #[test]
    fn test_per_call_ttl_expires() {
        let cache = new_cache();

        cache
            .set("short", "v", Some(Duration::from_millis(100)))
            .unwrap();
        assert!(cache.get_raw("short").is_some());

        sleep(Duration::from_millis(300));
        assert_eq!(cache.get_raw("short"), None);
    }

    #[test]
    fn test_idle_expiry_reset_on_access() {
        let config = MemoryConfig {
            expires_in: Duration::from_millis(400),
            ..MemoryConfig::default()
        };
        let cache = MemoryCache::new(&config).unwrap();

        cache.set("idle", "v", None).unwrap();

        // Each read lands inside the idle window and resets it
        for _ in 0..3 {
            sleep(Duration::from_millis(200));
            assert!(cache.get_raw("idle").is_some());
        }

        sleep(Duration::from_millis(700));
        assert_eq!(cache.get_raw("idle"), None);
    }

    #[test]
    fn test_ttl_too_long_rejected() {
        let cache = new_cache();

        let result = cache.set("k", 1, Some(MAX_EXPIRY + Duration::from_secs(1)));
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = new_cache();
        let other = cache.clone();

        cache.set("shared", 1, None).unwrap();
        assert_eq!(other.get::<i32>("shared").unwrap(), Some(1));
    }
}
