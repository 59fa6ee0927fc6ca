//! Memory Loader Module
//!
//! Builds a [`MemoryCache`] from configuration and runs its install/connect hooks.

use std::any::Any;

use tracing::{debug, info};

use crate::cache::MemoryCache;
use crate::config::MemoryConfig;
use crate::error::{CacheError, Result};
use crate::library::{Library, Lifecycle};

// == Memory Loader ==
/// Loader that owns the cache handle it produced.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    name: String,
    memory: Option<MemoryCache>,
}

impl MemoryLoader {
    /// Creates a loader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            memory: None,
        }
    }

    /// Returns the handle produced by the last successful `init`.
    pub fn memory(&self) -> Option<&MemoryCache> {
        self.memory.as_ref()
    }

    /// Initializes from untyped host arguments.
    ///
    /// The first argument must be a [`MemoryConfig`].
    ///
    /// # Errors
    /// Returns `CacheError::InvalidArgument` if the first argument is missing
    /// or has another type, or any error from [`Library::init`].
    pub fn init_from_args(&mut self, args: &[&dyn Any]) -> Result<MemoryCache> {
        let config = args
            .first()
            .and_then(|arg| arg.downcast_ref::<MemoryConfig>())
            .ok_or_else(|| {
                CacheError::InvalidArgument(format!(
                    "{}: first argument must be a MemoryConfig",
                    self.name
                ))
            })?;

        self.init(config)
    }
}

impl Library for MemoryLoader {
    type Config = MemoryConfig;
    type Handle = MemoryCache;

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, config: &MemoryConfig) -> Result<MemoryCache> {
        let memory = MemoryCache::new(config)?;

        memory.install()?;
        memory.connect()?;
        debug!(library = %self.name, "Memory cache installed and connected");

        self.memory = Some(memory.clone());
        info!(library = %self.name, "Memory library initialized");
        Ok(memory)
    }
}
