//! Error types for the memory cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the memory cache adapter and its HTTP surface.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache engine could not be constructed from the given config
    #[error("Invalid cache configuration: {0}")]
    Config(String),

    /// A host passed an argument of the wrong type or shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A `None` value was handed to `set`
    #[error("Cannot set nil pointer value for key {key}")]
    NilValue { key: String },

    /// The value could not be serialized to JSON
    #[error("Failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The cache declined to store the value
    #[error("Failed to store key {key} in memory cache: {reason}")]
    Rejected { key: String, reason: String },

    /// The stored value does not decode as the requested type
    #[error("Failed to decode value for key {key}: {reason}")]
    Decode { key: String, reason: String },

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidArgument(_)
            | CacheError::InvalidRequest(_)
            | CacheError::NilValue { .. }
            | CacheError::Encode { .. } => StatusCode::BAD_REQUEST,
            CacheError::Rejected { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the memory cache.
pub type Result<T> = std::result::Result<T, CacheError>;
