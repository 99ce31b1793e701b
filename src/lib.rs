// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture crate for path-addressed per-user configuration.
//!
//! This crate keeps a tree of user settings (sections nesting down to scalar
//! values) behind a small access service. Clients read and write individual
//! settings by dot-separated path; every mutation is saved to a persistence
//! collaborator before the call returns.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and the service contract (`ConfigPath`,
//!   `ConfigValue`, `ConfigSection`, messages, errors)
//! - **Ports**: Trait definitions for collaborators (`ConfigPersistence`,
//!   `ConfigParser`, `ConfigWatcher`)
//! - **Adapters**: File and in-memory persistence, YAML/JSON formats, file
//!   watching and the command-line front end
//! - **Service**: The shared `ConfigStore` and `DefaultUserConfigService`
//!
//! # Operations
//!
//! - `Get`: the value at a path, whatever its variant
//! - `GetString`: a scalar rendered as a string
//! - `GetSection`: the entries of a section
//! - `Set`: assign a value, creating intermediate sections as needed
//! - `Unset`: remove a value; removing a missing path succeeds
//!
//! A path that does not resolve is reported with `found == false`, never as an
//! error.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `json`: Enable JSON file support (default)
//! - `cli`: Build the `usercfg` command-line binary (default)
//! - `reload`: Reload the store when the configuration file changes
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use usercfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let service = DefaultUserConfigService::builder().in_memory().build()?;
//!
//! service.set("defaults.template", ConfigValue::from("starter"))?;
//! let defaults = service.get_section("defaults")?;
//! assert_eq!(defaults.section.len(), 1);
//!
//! service.unset("defaults.template")?;
//! assert!(!service.get("defaults.template")?.found);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigPath, ConfigRequest, ConfigResponse, ConfigSection, ConfigValue,
        Result, UserConfigService,
    };
    pub use crate::ports::{ConfigParser, ConfigPersistence, ConfigWatcher};
    pub use crate::service::{ConfigStore, DefaultUserConfigService, UserConfigServiceBuilder};

    pub use crate::adapters::{FilePersistence, InMemoryPersistence};

    // Re-export adapters based on feature flags
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
