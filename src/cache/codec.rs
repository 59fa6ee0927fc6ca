//! Value Codec Module
//!
//! Converts typed values to and from the string form kept in the cache.
//! Encoding follows the value's type; decoding follows the requested output
//! type, since no type tag is stored alongside the value.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::CacheError;

// == Codec Errors ==
/// Failure to turn a value into its cached string form.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value was `None`
    #[error("nil value")]
    Nil,

    /// JSON serialization failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EncodeError {
    /// Attaches the key the value was destined for.
    pub fn into_cache_error(self, key: &str) -> CacheError {
        match self {
            EncodeError::Nil => CacheError::NilValue {
                key: key.to_string(),
            },
            EncodeError::Json(source) => CacheError::Encode {
                key: key.to_string(),
                source,
            },
        }
    }
}

/// Failure to parse a cached string as the requested type.
#[derive(Debug, Error)]
#[error("expected {expected}: {reason}")]
pub struct DecodeError {
    expected: &'static str,
    reason: String,
}

impl DecodeError {
    pub fn new(expected: &'static str, reason: impl ToString) -> Self {
        Self {
            expected,
            reason: reason.to_string(),
        }
    }
}

// == Traits ==
/// Types that can be written to the cache.
pub trait ToCacheValue {
    fn to_cache_value(&self) -> Result<String, EncodeError>;
}

/// Types that can be read back out of the cache.
pub trait FromCacheValue: Sized {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError>;
}

// == Strings ==
impl ToCacheValue for str {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        Ok(self.to_owned())
    }
}

impl ToCacheValue for String {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        Ok(self.clone())
    }
}

impl FromCacheValue for String {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
        Ok(raw.to_owned())
    }
}

impl ToCacheValue for char {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        Ok(self.to_string())
    }
}

impl FromCacheValue for char {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::new("char", "value is not a single character")),
        }
    }
}

// == Numbers ==
macro_rules! impl_parsed {
    ($($ty:ty),* $(,)?) => {$(
        impl ToCacheValue for $ty {
            fn to_cache_value(&self) -> Result<String, EncodeError> {
                Ok(self.to_string())
            }
        }

        impl FromCacheValue for $ty {
            fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
                raw.parse::<$ty>()
                    .map_err(|e| DecodeError::new(stringify!($ty), e))
            }
        }
    )*};
}

// Display gives the shortest representation that parses back to the same float
impl_parsed!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

// == Booleans ==
impl ToCacheValue for bool {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        Ok(if *self { "1" } else { "0" }.to_string())
    }
}

/// Only `"1"` reads as true; every other string reads as false.
impl FromCacheValue for bool {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
        Ok(raw == "1")
    }
}

// == Pointers ==
impl<T: ToCacheValue + ?Sized> ToCacheValue for &T {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        (**self).to_cache_value()
    }
}

impl<T: ToCacheValue + ?Sized> ToCacheValue for Box<T> {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        (**self).to_cache_value()
    }
}

impl<T: ToCacheValue + ?Sized> ToCacheValue for Arc<T> {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        (**self).to_cache_value()
    }
}

impl<T: ToCacheValue> ToCacheValue for Option<T> {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        match self {
            Some(value) => value.to_cache_value(),
            None => Err(EncodeError::Nil),
        }
    }
}

impl<T: FromCacheValue> FromCacheValue for Option<T> {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
        T::from_cache_value(raw).map(Some)
    }
}

// == JSON ==
/// Wrapper storing any serde type as JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> ToCacheValue for Json<T> {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl<T: DeserializeOwned> FromCacheValue for Json<T> {
    fn from_cache_value(raw: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(raw)
            .map(Json)
            .map_err(|e| DecodeError::new("json", e))
    }
}

/// Dispatches on the runtime shape of the value: strings, numbers and
/// booleans use their primitive encoding, everything else is JSON.
impl ToCacheValue for Value {
    fn to_cache_value(&self) -> Result<String, EncodeError> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => b.to_cache_value(),
            Value::Number(n) => Ok(if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
            }),
            other => Ok(serde_json::to_string(other)?),
        }
    }
}
