//! Library Capability Module
//!
//! Traits a plugin host uses to name, initialize and drive the lifecycle of a
//! library instance.

use crate::error::Result;

// == Lifecycle ==
/// Lifecycle hooks invoked by a plugin host.
///
/// Every hook defaults to a no-op that succeeds.
pub trait Lifecycle {
    fn install(&self) -> Result<()> {
        Ok(())
    }

    fn connect(&self) -> Result<()> {
        Ok(())
    }

    fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    fn uninstall(&self) -> Result<()> {
        Ok(())
    }
}

// == Library ==
/// A named, configurable library that produces a handle on `init`.
pub trait Library {
    /// Configuration consumed by `init`
    type Config;
    /// Handle returned to the host
    type Handle: Lifecycle;

    fn set_name(&mut self, name: &str);

    fn name(&self) -> &str;

    fn init(&mut self, config: &Self::Config) -> Result<Self::Handle>;
}
