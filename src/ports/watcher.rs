// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, which observes the medium behind
//! a persistence collaborator and reports changes made by other processes so the
//! in-memory tree can be reloaded.

use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// The callback receives the location that changed, for example the path of a
/// configuration file.
pub type ChangeCallback = Arc<dyn Fn(&Path) + Send + Sync>;

/// A trait for watching persisted configuration for external changes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use usercfg::ports::{ChangeCallback, ConfigWatcher};
/// use usercfg::domain::Result;
///
/// struct MyWatcher;
///
/// impl ConfigWatcher for MyWatcher {
///     fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
///         // Implementation here
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching for changes.
    ///
    /// When a change is detected, the callback is invoked with the location that
    /// changed. The callback runs on the watcher's thread and should return
    /// quickly.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The watcher was successfully started
    /// * `Err(ConfigError)` - The watcher could not be started or is already running
    fn watch(&mut self, callback: ChangeCallback) -> Result<()>;

    /// Stops watching for changes.
    ///
    /// After calling this method, no more change notifications will be sent.
    /// Stopping a watcher that is not running is a no-op.
    fn stop(&mut self) -> Result<()>;
}
