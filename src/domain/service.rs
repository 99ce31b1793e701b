// SPDX-License-Identifier: MIT OR Apache-2.0

//! User configuration service trait definition.
//!
//! This module defines the `UserConfigService` trait, the single interface through
//! which clients read and mutate the configuration tree. Transports bind to the
//! provided [`handle`](UserConfigService::handle) method rather than to each
//! operation separately.

use crate::domain::messages::{
    ConfigRequest, ConfigResponse, GetResponse, GetSectionResponse, GetStringResponse,
};
use crate::domain::{ConfigValue, Result};

/// The path-addressed configuration access interface.
///
/// Paths are dot-separated strings; the empty string addresses the root
/// section. A path that does not resolve is reported through the `found` flag
/// of the read responses and is never an error.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single instance is expected to serve
/// concurrent callers.
///
/// # Examples
///
/// ```rust
/// use usercfg::domain::messages::{ConfigRequest, ConfigResponse};
/// use usercfg::domain::{ConfigValue, UserConfigService};
/// use usercfg::service::DefaultUserConfigService;
///
/// # fn main() -> usercfg::domain::Result<()> {
/// let service = DefaultUserConfigService::builder().in_memory().build()?;
///
/// service.set("defaults.template", ConfigValue::from("starter"))?;
/// let response = service.get_string("defaults.template")?;
/// assert!(response.found);
/// assert_eq!(response.value, "starter");
///
/// // The same operation through the single dispatch path
/// let response = service.handle(ConfigRequest::Get {
///     path: "defaults.template".to_string(),
/// })?;
/// assert_eq!(response.found(), Some(true));
/// # Ok(())
/// # }
/// ```
pub trait UserConfigService: Send + Sync {
    /// Retrieves the value at `path`, whatever its variant.
    ///
    /// # Errors
    ///
    /// Fails only for a malformed path.
    fn get(&self, path: &str) -> Result<GetResponse>;

    /// Retrieves the value at `path` rendered as a string.
    ///
    /// Booleans render as `true`/`false`, numbers in canonical decimal form and
    /// strings verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOperation` if the path resolves to a section.
    fn get_string(&self, path: &str) -> Result<GetStringResponse>;

    /// Retrieves the immediate entries of the section at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOperation` if the path resolves to a value
    /// that is not a section.
    fn get_section(&self, path: &str) -> Result<GetSectionResponse>;

    /// Assigns `value` at `path`, creating intermediate sections as needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PersistenceFailure` if the change could not be
    /// saved; the in-memory tree has already been updated in that case.
    fn set(&self, path: &str, value: ConfigValue) -> Result<()>;

    /// Removes the value at `path`. Removing a missing path succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::PersistenceFailure` if a removal could not be saved.
    fn unset(&self, path: &str) -> Result<()>;

    /// Dispatches a request to the matching operation.
    fn handle(&self, request: ConfigRequest) -> Result<ConfigResponse> {
        match request {
            ConfigRequest::Get { path } => self.get(&path).map(ConfigResponse::Get),
            ConfigRequest::GetString { path } => {
                self.get_string(&path).map(ConfigResponse::GetString)
            }
            ConfigRequest::GetSection { path } => {
                self.get_section(&path).map(ConfigResponse::GetSection)
            }
            ConfigRequest::Set { path, value } => {
                self.set(&path, value).map(|()| ConfigResponse::Empty {})
            }
            ConfigRequest::Unset { path } => self.unset(&path).map(|()| ConfigResponse::Empty {}),
        }
    }
}
