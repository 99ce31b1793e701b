// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) for the collaborators the
//! configuration store depends on: where the tree is persisted, how documents are
//! parsed and rendered, and how external changes are observed. These traits are
//! implemented by adapters in the adapters layer.

pub mod parser;
pub mod persistence;
pub mod watcher;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use persistence::ConfigPersistence;
pub use watcher::{ChangeCallback, ConfigWatcher};
