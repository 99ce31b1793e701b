// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration persistence trait definition.
//!
//! This module defines the `ConfigPersistence` trait, the port through which the
//! configuration store loads its root section at startup and saves it after every
//! mutation. Any backing medium (a file, an in-memory buffer, a remote service)
//! implements this trait.

use crate::domain::{ConfigSection, Result};

/// A trait for configuration persistence collaborators.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The store serializes calls to `save`
/// behind its write lock, so implementations never see two saves at once from
/// the same store.
///
/// # Examples
///
/// ```rust
/// use usercfg::ports::ConfigPersistence;
/// use usercfg::domain::{ConfigSection, Result};
///
/// struct NullPersistence;
///
/// impl ConfigPersistence for NullPersistence {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     fn load(&self) -> Result<ConfigSection> {
///         Ok(ConfigSection::new())
///     }
///
///     fn save(&self, _root: &ConfigSection) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let persistence = NullPersistence;
/// assert!(persistence.load().unwrap().is_empty());
/// ```
pub trait ConfigPersistence: Send + Sync {
    /// Returns the name of this collaborator.
    ///
    /// This name is used for logging and error messages. It should be a short
    /// identifier like "file" or "memory".
    fn name(&self) -> &str;

    /// Loads the root section.
    ///
    /// A medium that holds no configuration yet should return an empty section
    /// rather than an error.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigSection)` - The stored root
    /// * `Err(ConfigError)` - The stored configuration could not be read or parsed
    fn load(&self) -> Result<ConfigSection>;

    /// Loads the root section again after the medium changed underneath the
    /// store.
    ///
    /// Returns `Ok(None)` when the medium looks like it is in the middle of
    /// being rewritten and the current tree should be kept. The default
    /// delegates to [`load`](Self::load).
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConfigSection))` - The new root
    /// * `Ok(None)` - Nothing usable yet; keep the current tree
    /// * `Err(ConfigError)` - The stored configuration could not be read or parsed
    fn reload(&self) -> Result<Option<ConfigSection>> {
        self.load().map(Some)
    }

    /// Durably saves the root section.
    ///
    /// The call must not return `Ok` unless the data has been handed to the
    /// medium.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The root was saved
    /// * `Err(ConfigError)` - The root could not be saved
    fn save(&self, root: &ConfigSection) -> Result<()>;
}
