//! Axum handlers translating HTTP calls into memory cache operations.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::MemoryCache;
use crate::config::MemoryConfig;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Handle cloned into every request; the cache synchronizes internally.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: MemoryCache,
}

impl AppState {
    pub fn new(cache: MemoryCache) -> Self {
        Self { cache }
    }

    /// Builds a fresh cache from `config` and wraps it.
    pub fn from_config(config: &MemoryConfig) -> Result<Self> {
        Ok(Self::new(MemoryCache::new(config)?))
    }
}

/// `PUT /set`: encodes the JSON value by its shape and stores it.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .cache
        .set(&req.key, &req.value, req.ttl.map(Duration::from_secs))?;

    Ok(Json(SetResponse::new(req.key)))
}

/// `GET /get/:key`: returns the stored string, undecoded.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get_raw(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// `DELETE /del/:key`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
