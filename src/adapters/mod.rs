// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing persistence, parser and front-end implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: collaborators that load and save the configuration tree, the
//! document formats they read and write, file watchers, and the command-line
//! front end.

#[cfg(feature = "cli")]
pub mod cli;
pub mod file;
#[cfg(feature = "json")]
pub mod json;
pub mod memory;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

pub use file::{default_config_dir, parser_for_path, FilePersistence};
pub use memory::InMemoryPersistence;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::{Cli, ConfigCommand};
#[cfg(feature = "json")]
pub use json::JsonParser;
#[cfg(feature = "reload")]
pub use watchers::FileWatcher;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
