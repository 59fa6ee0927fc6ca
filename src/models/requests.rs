//! Request bodies accepted by the memory cache API

use serde::Deserialize;
use serde_json::Value;

/// Body of `PUT /set`.
///
/// Strings, numbers and booleans in `value` are cached in their primitive
/// form; null, arrays and objects are cached as JSON text.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    /// Fixed lifetime in seconds; omitted means the idle expiry applies
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns a message describing why the request cannot be stored.
    pub fn validate(&self) -> Option<String> {
        self.key
            .is_empty()
            .then(|| "Key cannot be empty".to_string())
    }
}
