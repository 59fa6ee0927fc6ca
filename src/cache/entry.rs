//! Cache Entry Module
//!
//! Defines the stored entry and the per-entry expiry policy handed to the engine.

use std::time::{Duration, Instant};

use moka::Expiry;

/// Longest duration the engine accepts for an expiry (1000 years).
pub const MAX_EXPIRY: Duration = Duration::from_secs(1000 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A single stored value with its optional fixed TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The encoded value
    pub value: String,
    /// Fixed TTL set on write; None = access-based expiry applies
    pub ttl: Option<Duration>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry. A zero TTL is treated as no override.
    pub fn new(value: String, ttl: Option<Duration>) -> Self {
        Self {
            value,
            ttl: ttl.filter(|d| !d.is_zero()),
        }
    }
}

// == Entry Expiry ==
/// Expiry policy combining a global idle timeout with per-entry fixed TTLs.
///
/// - Entries written without a TTL expire `idle` after their last read or write.
/// - Entries written with a TTL expire that long after the write; reads do not
///   extend them.
/// - With no idle timeout configured, entries without a TTL never expire.
#[derive(Debug, Clone, Copy)]
pub struct EntryExpiry {
    idle: Option<Duration>,
}

impl EntryExpiry {
    /// Creates the policy. A zero `expires_in` disables idle expiry.
    pub fn new(expires_in: Duration) -> Self {
        Self {
            idle: (!expires_in.is_zero()).then_some(expires_in),
        }
    }

    /// Returns the idle timeout, if any.
    pub fn idle(&self) -> Option<Duration> {
        self.idle
    }

    fn on_write(&self, entry: &CacheEntry) -> Option<Duration> {
        entry.ttl.or(self.idle)
    }
}

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        self.on_write(value)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &CacheEntry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        match value.ttl {
            Some(_) => duration_until_expiry,
            None => self.idle,
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.on_write(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> String {
        "key".to_string()
    }

    #[test]
    fn test_entry_zero_ttl_is_no_override() {
        let entry = CacheEntry::new("v".to_string(), Some(Duration::ZERO));
        assert!(entry.ttl.is_none());

        let entry = CacheEntry::new("v".to_string(), Some(Duration::from_secs(5)));
        assert_eq!(entry.ttl, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_idle_expiry_resets_on_read() {
        let expiry = EntryExpiry::new(Duration::from_secs(60));
        let entry = CacheEntry::new("v".to_string(), None);
        let now = Instant::now();

        assert_eq!(
            expiry.expire_after_create(&key(), &entry, now),
            Some(Duration::from_secs(60))
        );
        // Remaining time is replaced by the full idle window
        assert_eq!(
            expiry.expire_after_read(&key(), &entry, now, Some(Duration::from_secs(3)), now),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_fixed_ttl_not_extended_by_read() {
        let expiry = EntryExpiry::new(Duration::from_secs(60));
        let entry = CacheEntry::new("v".to_string(), Some(Duration::from_secs(10)));
        let now = Instant::now();

        assert_eq!(
            expiry.expire_after_create(&key(), &entry, now),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            expiry.expire_after_read(&key(), &entry, now, Some(Duration::from_secs(4)), now),
            Some(Duration::from_secs(4))
        );
        assert_eq!(
            expiry.expire_after_update(&key(), &entry, now, Some(Duration::from_secs(4))),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_zero_idle_disables_expiry() {
        let expiry = EntryExpiry::new(Duration::ZERO);
        let entry = CacheEntry::new("v".to_string(), None);

        assert!(expiry.idle().is_none());
        assert_eq!(expiry.expire_after_create(&key(), &entry, Instant::now()), None);
    }
}
